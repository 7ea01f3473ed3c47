// nlse_ssfm - Split-step Fourier solver for the generalized nonlinear
// Schrödinger equation
// Copyright (C) 2024 nlse_ssfm contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Energy-preserving maps between the time and frequency domain
//!
//! The convention follows the zero-centered axes of [`TimeFreq`]: the
//! forward map is DFT, shift of the zero-frequency bin to the middle, then
//! scaling by `dt`, so a field in sqrt(W) becomes a spectrum in sqrt(W)/Hz
//! and trapezoidal energies agree in both domains. Every crossing is audited
//! against the configured tolerance.

use std::f64::consts::PI;
use std::sync::Arc;

use num_complex::Complex64;
use num_traits::Zero;
use rustfft::{Fft, FftPlanner};

use crate::error::{SsfmError, TransformDirection};
use crate::field::get_energy;
use crate::grid::TimeFreq;

/// Default relative tolerance for the energy audit at transform boundaries
pub const DEFAULT_FFT_TOL: f64 = 1e-7;

/// Move the zero-frequency bin of a DFT output to the middle of the buffer
pub fn fft_shift(buf: &mut [Complex64]) {
    let n = buf.len();
    buf.rotate_left((n + 1) / 2);
}

/// Inverse of [`fft_shift`]
pub fn ifft_shift(buf: &mut [Complex64]) {
    let n = buf.len();
    buf.rotate_left(n / 2);
}

/// Planned FFT pair bound to one grid, with the energy audit baked in.
///
/// Planning is done once per grid; the forward and inverse kernels are
/// shared `Arc<dyn Fft>` handles with a common scratch buffer.
pub struct SpectralTransform {
    time_freq: Arc<TimeFreq>,
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
    fft_tol: f64,
}

impl SpectralTransform {
    pub fn new(time_freq: Arc<TimeFreq>, fft_tol: f64) -> Result<SpectralTransform, SsfmError> {
        if !(fft_tol > 0.0) || !fft_tol.is_finite() {
            return Err(SsfmError::invalid_parameter("fft_tol", fft_tol));
        }
        let n = time_freq.number_of_points();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        let ifft = planner.plan_fft_inverse(n);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());
        Ok(SpectralTransform {
            time_freq,
            fft,
            ifft,
            scratch: vec![Complex64::zero(); scratch_len],
            fft_tol,
        })
    }

    pub fn time_freq(&self) -> &Arc<TimeFreq> {
        &self.time_freq
    }

    pub fn fft_tol(&self) -> f64 {
        self.fft_tol
    }

    /// Forward map: time-domain field in sqrt(W) to spectrum in sqrt(W)/Hz.
    ///
    /// An all-zero field maps to an all-zero spectrum without an audit; any
    /// other field must conserve trapezoidal energy to within the tolerance.
    pub fn spectrum_from_pulse(&mut self, pulse: &[Complex64]) -> Result<Vec<Complex64>, SsfmError> {
        self.check_length(pulse)?;
        let energy_t = get_energy(self.time_freq.t(), pulse);
        if !energy_t.is_finite() {
            return Err(SsfmError::NumericalInstability {
                step: 0,
                what: "pulse".to_string(),
            });
        }
        if energy_t == 0.0 {
            return Ok(vec![Complex64::zero(); pulse.len()]);
        }
        let dt = self.time_freq.time_step();
        let mut spectrum = pulse.to_vec();
        self.fft.process_with_scratch(&mut spectrum, &mut self.scratch);
        fft_shift(&mut spectrum);
        for s in spectrum.iter_mut() {
            *s = *s * dt;
        }
        let energy_f = get_energy(self.time_freq.f(), &spectrum);
        self.audit(energy_t, energy_f, TransformDirection::PulseToSpectrum)?;
        Ok(spectrum)
    }

    /// Inverse map: spectrum in sqrt(W)/Hz back to a time-domain field.
    pub fn pulse_from_spectrum(
        &mut self,
        spectrum: &[Complex64],
    ) -> Result<Vec<Complex64>, SsfmError> {
        self.check_length(spectrum)?;
        let energy_f = get_energy(self.time_freq.f(), spectrum);
        if !energy_f.is_finite() {
            return Err(SsfmError::NumericalInstability {
                step: 0,
                what: "spectrum".to_string(),
            });
        }
        if energy_f == 0.0 {
            return Ok(vec![Complex64::zero(); spectrum.len()]);
        }
        let n = self.time_freq.number_of_points() as f64;
        let dt = self.time_freq.time_step();
        let mut pulse = spectrum.to_vec();
        ifft_shift(&mut pulse);
        self.ifft.process_with_scratch(&mut pulse, &mut self.scratch);
        let scale = 1.0 / (n * dt);
        for p in pulse.iter_mut() {
            *p = *p * scale;
        }
        let energy_t = get_energy(self.time_freq.t(), &pulse);
        self.audit(energy_t, energy_f, TransformDirection::SpectrumToPulse)?;
        Ok(pulse)
    }

    /// Spectral time derivative `d/dt` of a time-domain buffer.
    ///
    /// Used by the self-steepening term; this is a raw derivative, not an
    /// energy-preserving domain crossing, so no audit applies.
    pub fn time_derivative(&mut self, a: &[Complex64]) -> Vec<Complex64> {
        let n = a.len() as f64;
        let mut buf = a.to_vec();
        self.fft.process_with_scratch(&mut buf, &mut self.scratch);
        fft_shift(&mut buf);
        for (b, f) in buf.iter_mut().zip(self.time_freq.f()) {
            *b = *b * Complex64::new(0.0, 2.0 * PI * f);
        }
        ifft_shift(&mut buf);
        self.ifft.process_with_scratch(&mut buf, &mut self.scratch);
        for b in buf.iter_mut() {
            *b = *b / n;
        }
        buf
    }

    fn check_length(&self, buf: &[Complex64]) -> Result<(), SsfmError> {
        if buf.len() != self.time_freq.number_of_points() {
            return Err(SsfmError::invalid_parameter("field length", buf.len()));
        }
        Ok(())
    }

    fn audit(
        &self,
        energy_t: f64,
        energy_f: f64,
        direction: TransformDirection,
    ) -> Result<(), SsfmError> {
        let err = (energy_t / energy_f - 1.0).abs();
        if !err.is_finite() || err > self.fft_tol {
            return Err(SsfmError::EnergyMismatch {
                direction,
                step: 0,
                relative_error: err,
                tolerance: self.fft_tol,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::compare_field_energies;

    fn gaussian_field(tf: &TimeFreq, amplitude: f64, tau: f64) -> Vec<Complex64> {
        tf.t()
            .iter()
            .map(|t| Complex64::new(amplitude * (-0.5 * (t / tau) * (t / tau)).exp(), 0.0))
            .collect()
    }

    #[test]
    fn energy_is_preserved_across_the_boundary() {
        for &n in &[1usize << 10, 1 << 13, 1 << 16] {
            let tf = Arc::new(TimeFreq::new(n, 100e-15, 193.4e12).unwrap());
            let pulse = gaussian_field(&tf, 0.7, 10e-12);
            let mut transform = SpectralTransform::new(tf.clone(), DEFAULT_FFT_TOL).unwrap();
            let spectrum = transform.spectrum_from_pulse(&pulse).unwrap();
            let e_t = get_energy(tf.t(), &pulse);
            let e_f = get_energy(tf.f(), &spectrum);
            assert!(
                (e_t / e_f - 1.0).abs() <= 1e-7,
                "N = {}: energy ratio error {}",
                n,
                (e_t / e_f - 1.0).abs()
            );
        }
    }

    #[test]
    fn round_trip_reproduces_smooth_input() {
        for &n in &[1usize << 10, 1 << 12, 1 << 16] {
            let tf = Arc::new(TimeFreq::new(n, 50e-15, 193.4e12).unwrap());
            let pulse = gaussian_field(&tf, 1.3, 5e-12);
            let mut transform = SpectralTransform::new(tf, DEFAULT_FFT_TOL).unwrap();
            let spectrum = transform.spectrum_from_pulse(&pulse).unwrap();
            let back = transform.pulse_from_spectrum(&spectrum).unwrap();
            let err = compare_field_energies(&pulse, &back).sqrt();
            assert!(err < 1e-12, "N = {}: round-trip error {}", n, err);
        }
    }

    #[test]
    fn zero_field_maps_to_zero_spectrum() {
        let tf = Arc::new(TimeFreq::new(256, 1e-12, 1e12).unwrap());
        let mut transform = SpectralTransform::new(tf.clone(), DEFAULT_FFT_TOL).unwrap();
        let zeros = vec![Complex64::zero(); 256];
        let spectrum = transform.spectrum_from_pulse(&zeros).unwrap();
        assert!(spectrum.iter().all(|s| s.norm_sqr() == 0.0));
    }

    #[test]
    fn carrier_offset_moves_the_spectral_peak() {
        let tf = Arc::new(TimeFreq::new(1 << 12, 50e-15, 193.4e12).unwrap());
        let offset = 1e12; // 1 THz
        let pulse: Vec<Complex64> = tf
            .t()
            .iter()
            .map(|t| {
                let envelope = (-0.5 * (t / 2e-12) * (t / 2e-12)).exp();
                Complex64::from_polar(envelope, 2.0 * PI * offset * t)
            })
            .collect();
        let mut transform = SpectralTransform::new(tf.clone(), DEFAULT_FFT_TOL).unwrap();
        let spectrum = transform.spectrum_from_pulse(&pulse).unwrap();
        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm_sqr().partial_cmp(&b.norm_sqr()).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!(
            (tf.f()[peak_bin] - offset).abs() <= 2.0 * tf.freq_step(),
            "peak at {} Hz, expected near {} Hz",
            tf.f()[peak_bin],
            offset
        );
    }

    #[test]
    fn derivative_of_plane_wave_is_analytic() {
        let tf = Arc::new(TimeFreq::new(1 << 10, 1e-12, 1e12).unwrap());
        let f0 = 25.0 * tf.freq_step();
        let wave: Vec<Complex64> = tf
            .t()
            .iter()
            .map(|t| Complex64::from_polar(1.0, 2.0 * PI * f0 * t))
            .collect();
        let mut transform = SpectralTransform::new(tf.clone(), DEFAULT_FFT_TOL).unwrap();
        let deriv = transform.time_derivative(&wave);
        let expected: Vec<Complex64> = wave
            .iter()
            .map(|w| w * Complex64::new(0.0, 2.0 * PI * f0))
            .collect();
        let err = compare_field_energies(&expected, &deriv);
        assert!(err < 1e-20, "derivative error {}", err);
    }
}
