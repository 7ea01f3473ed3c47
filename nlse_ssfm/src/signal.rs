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

//! Pulse constructors and the signal launched into a link

use std::f64::consts::PI;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use itertools::izip;
use num_complex::Complex64;
use num_traits::Zero;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::SsfmError;
use crate::field::{get_energy, peak_power, rms_duration};
use crate::grid::TimeFreq;
use crate::transforms::SpectralTransform;

/// Super-Gaussian order used to emulate a square pulse
const SQUARE_PULSE_ORDER: u32 = 100;

/// Exponent magnitude beyond which the envelope underflows to zero anyway;
/// used to avoid inf/NaN from `x^(2*order)` far out in the wings
const ENVELOPE_EXPONENT_CUTOFF: f64 = 1400.0;

/// Shape of the launched pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseType {
    /// Gaussian or super-Gaussian, depending on the order parameter
    Gaussian,
    /// Hyperbolic secant, the fundamental soliton shape
    Sech,
    /// Square pulse, emulated as a high-order super-Gaussian
    Square,
    /// No analytic shape: only noise is generated and the caller supplies
    /// the field
    Custom,
}

impl fmt::Display for PulseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PulseType::Gaussian => "gaussian",
            PulseType::Sech => "sech",
            PulseType::Square => "square",
            PulseType::Custom => "custom",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PulseType {
    type Err = SsfmError;

    fn from_str(s: &str) -> Result<PulseType, SsfmError> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" | "gauss" => Ok(PulseType::Gaussian),
            "sech" => Ok(PulseType::Sech),
            "square" => Ok(PulseType::Square),
            "custom" => Ok(PulseType::Custom),
            _ => Err(SsfmError::invalid_parameter("pulse_type", s)),
        }
    }
}

/// Parameters describing the launched pulse.
///
/// `duration` is the 1/e amplitude half-width for Gaussian pulses and the
/// sech width for sech pulses. `carrier_freq_offset` shifts the pulse
/// spectrum relative to the grid's center frequency.
#[derive(Debug, Clone)]
pub struct PulseParameters {
    /// Peak amplitude in sqrt(W)
    pub peak_amplitude: f64,
    /// Characteristic duration in s
    pub duration: f64,
    /// Delay of the pulse center relative to t = 0, in s
    pub time_offset: f64,
    /// Dimensionless linear chirp parameter
    pub chirp: f64,
    /// Frequency offset from the grid center frequency, in Hz
    pub carrier_freq_offset: f64,
    pub pulse_type: PulseType,
    /// Super-Gaussian order; 1 is a plain Gaussian
    pub order: u32,
    /// Standard deviation of the additive white noise, in sqrt(W)
    pub noise_amplitude: f64,
}

impl PulseParameters {
    pub fn new(peak_amplitude: f64, duration: f64, pulse_type: PulseType) -> PulseParameters {
        PulseParameters {
            peak_amplitude,
            duration,
            time_offset: 0.0,
            chirp: 0.0,
            carrier_freq_offset: 0.0,
            pulse_type,
            order: 1,
            noise_amplitude: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), SsfmError> {
        if !(self.duration > 0.0) || !self.duration.is_finite() {
            return Err(SsfmError::invalid_parameter("duration", self.duration));
        }
        if !self.peak_amplitude.is_finite() {
            return Err(SsfmError::invalid_parameter(
                "peak_amplitude",
                self.peak_amplitude,
            ));
        }
        if self.order < 1 {
            return Err(SsfmError::invalid_parameter("order", self.order));
        }
        if !(self.noise_amplitude >= 0.0) || !self.noise_amplitude.is_finite() {
            return Err(SsfmError::invalid_parameter(
                "noise_amplitude",
                self.noise_amplitude,
            ));
        }
        Ok(())
    }
}

/// Gaussian (order 1) or super-Gaussian pulse:
/// `A * exp(-(1+i*C)/2 * ((t-t0)/tau)^(2*order)) * exp(-i*2*pi*f_off*t)`
pub fn gaussian_pulse(
    t: &[f64],
    peak_amplitude: f64,
    duration: f64,
    time_offset: f64,
    chirp: f64,
    order: u32,
    carrier_freq_offset: f64,
) -> Vec<Complex64> {
    t.iter()
        .map(|&ti| {
            let x = (ti - time_offset) / duration;
            let p = x.powi(2 * order as i32);
            if !p.is_finite() || p > ENVELOPE_EXPONENT_CUTOFF {
                return Complex64::zero();
            }
            let envelope = peak_amplitude * (-0.5 * p).exp();
            let phase = -0.5 * chirp * p - 2.0 * PI * carrier_freq_offset * ti;
            Complex64::from_polar(envelope, phase)
        })
        .collect()
}

/// Hyperbolic secant pulse:
/// `A / cosh((t-t0)/tau) * exp(-i*C/2 * ((t-t0)/tau)^2) * exp(-i*2*pi*f_off*t)`
pub fn sech_pulse(
    t: &[f64],
    peak_amplitude: f64,
    duration: f64,
    time_offset: f64,
    chirp: f64,
    carrier_freq_offset: f64,
) -> Vec<Complex64> {
    t.iter()
        .map(|&ti| {
            let x = (ti - time_offset) / duration;
            let envelope = peak_amplitude / x.cosh();
            let phase = -0.5 * chirp * x * x - 2.0 * PI * carrier_freq_offset * ti;
            Complex64::from_polar(envelope, phase)
        })
        .collect()
}

/// Square pulse as a super-Gaussian of fixed high order
pub fn square_pulse(
    t: &[f64],
    peak_amplitude: f64,
    duration: f64,
    time_offset: f64,
    chirp: f64,
    carrier_freq_offset: f64,
) -> Vec<Complex64> {
    gaussian_pulse(
        t,
        peak_amplitude,
        duration,
        time_offset,
        chirp,
        SQUARE_PULSE_ORDER,
        carrier_freq_offset,
    )
}

/// White noise: complex samples with Gaussian amplitude of standard
/// deviation `noise_amplitude` and uniform phase in [-pi, pi), drawn from
/// the caller's generator so runs are reproducible from a seed.
pub fn ase_noise<R: Rng + ?Sized>(
    n: usize,
    noise_amplitude: f64,
    rng: &mut R,
) -> Result<Vec<Complex64>, SsfmError> {
    let normal = Normal::new(0.0, noise_amplitude)
        .map_err(|_| SsfmError::invalid_parameter("noise_amplitude", noise_amplitude))?;
    Ok((0..n)
        .map(|_| {
            let amplitude = normal.sample(rng);
            let phase = rng.gen_range(-PI..PI);
            Complex64::from_polar(amplitude, phase)
        })
        .collect())
}

/// Build the pulse selected by `params` on the time axis `t`, noise included.
/// The custom arm carries no shape of its own and returns only the noise.
pub fn get_pulse<R: Rng + ?Sized>(
    t: &[f64],
    params: &PulseParameters,
    rng: &mut R,
) -> Result<Vec<Complex64>, SsfmError> {
    params.validate()?;
    let noise = ase_noise(t.len(), params.noise_amplitude, rng)?;
    let shaped = match params.pulse_type {
        PulseType::Gaussian => gaussian_pulse(
            t,
            params.peak_amplitude,
            params.duration,
            params.time_offset,
            params.chirp,
            params.order,
            params.carrier_freq_offset,
        ),
        PulseType::Sech => sech_pulse(
            t,
            params.peak_amplitude,
            params.duration,
            params.time_offset,
            params.chirp,
            params.carrier_freq_offset,
        ),
        PulseType::Square => square_pulse(
            t,
            params.peak_amplitude,
            params.duration,
            params.time_offset,
            params.chirp,
            params.carrier_freq_offset,
        ),
        PulseType::Custom => return Ok(noise),
    };
    let mut field = vec![Complex64::zero(); t.len()];
    for (out, a, b) in izip!(field.iter_mut(), shaped.iter(), noise.iter()) {
        *out = a + b;
    }
    Ok(field)
}

/// Signal launched into a fiber link: the complex field on its grid, the
/// matching spectrum and the launch statistics the step schedules need.
#[derive(Debug, Clone)]
pub struct InputSignal {
    pub time_freq: Arc<TimeFreq>,
    pub pulse_params: PulseParameters,
    /// Time-domain field in sqrt(W)
    pub field: Vec<Complex64>,
    /// Spectrum in sqrt(W)/Hz
    pub spectrum: Vec<Complex64>,
    /// Peak power of the field in W
    pub peak_power: f64,
    /// Characteristic duration used by the step schedules, in s
    pub duration: f64,
    /// Energy tolerance forwarded to every transform of this run
    pub fft_tol: f64,
}

impl InputSignal {
    /// Construct the signal from pulse parameters, drawing noise from `rng`
    pub fn new<R: Rng + ?Sized>(
        time_freq: Arc<TimeFreq>,
        pulse_params: PulseParameters,
        fft_tol: f64,
        rng: &mut R,
    ) -> Result<InputSignal, SsfmError> {
        let field = get_pulse(time_freq.t(), &pulse_params, rng)?;
        InputSignal::from_field(time_freq, pulse_params, field, fft_tol)
    }

    /// Adopt a caller-supplied field (the custom-pulse path)
    pub fn from_field(
        time_freq: Arc<TimeFreq>,
        pulse_params: PulseParameters,
        field: Vec<Complex64>,
        fft_tol: f64,
    ) -> Result<InputSignal, SsfmError> {
        pulse_params.validate()?;
        if field.len() != time_freq.number_of_points() {
            return Err(SsfmError::invalid_parameter("field length", field.len()));
        }
        let mut transform = SpectralTransform::new(time_freq.clone(), fft_tol)?;
        let spectrum = transform.spectrum_from_pulse(&field)?;
        let peak = peak_power(&field);
        let duration = pulse_params.duration;
        Ok(InputSignal {
            time_freq,
            pulse_params,
            field,
            spectrum,
            peak_power: peak,
            duration,
            fft_tol,
        })
    }

    /// Signal entering the next span: same grid and parameters, new field,
    /// with peak power and duration re-estimated from the field itself.
    pub(crate) fn advanced(
        &self,
        field: Vec<Complex64>,
        spectrum: Vec<Complex64>,
    ) -> InputSignal {
        let peak = peak_power(&field);
        let estimated = rms_duration(self.time_freq.t(), &field);
        let duration = if estimated.is_finite() && estimated > 0.0 {
            estimated
        } else {
            self.duration
        };
        InputSignal {
            time_freq: self.time_freq.clone(),
            pulse_params: self.pulse_params.clone(),
            field,
            spectrum,
            peak_power: peak,
            duration,
            fft_tol: self.fft_tol,
        }
    }

    /// Energy of the time-domain field in J
    pub fn energy(&self) -> f64 {
        get_energy(self.time_freq.t(), &self.field)
    }

    /// Print a human-readable summary of the signal
    pub fn describe(&self, out: &mut dyn Write) -> io::Result<()> {
        let p = &self.pulse_params;
        writeln!(out, " ### Input signal ###")?;
        writeln!(out, "  Peak power       = {:.3} W", self.peak_power)?;
        writeln!(out, "  Duration         = {:.3} ps", self.duration * 1e12)?;
        writeln!(out, "  Offset           = {:.3} ps", p.time_offset * 1e12)?;
        writeln!(out, "  Chirp            = {:.3}", p.chirp)?;
        writeln!(
            out,
            "  Carrier offset   = {:.3} THz",
            p.carrier_freq_offset / 1e12
        )?;
        writeln!(out, "  Pulse type       = {}", p.pulse_type)?;
        writeln!(out, "  Order            = {}", p.order)?;
        writeln!(
            out,
            "  Noise amplitude  = {:.3} sqrt(W)",
            p.noise_amplitude
        )?;
        writeln!(out, "  Energy           = {:.3e} J", self.energy())?;
        writeln!(out)
    }
}
