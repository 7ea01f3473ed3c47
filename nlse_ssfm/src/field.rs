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

//! Scalar diagnostics of a complex field: power, energy, phase and chirp
//!
//! All functions accept either a time-domain field (units sqrt(W) over a
//! time axis) or a spectral field (units sqrt(W)/Hz over a frequency axis);
//! the quadratures only assume a uniform axis.

use std::f64::consts::PI;

use num_complex::Complex64;

/// Instantaneous power `|a|^2` (or power spectral density in the frequency
/// domain).
pub fn get_power(field: &[Complex64]) -> Vec<f64> {
    field.iter().map(|a| a.norm_sqr()).collect()
}

/// Largest instantaneous power of the field
pub fn peak_power(field: &[Complex64]) -> f64 {
    field.iter().fold(0.0, |acc, a| acc.max(a.norm_sqr()))
}

/// Trapezoidal quadrature of `y` over the axis `x`
pub fn trapz(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) * 0.5)
        .sum()
}

/// Energy of the field: trapezoidal integral of `|a|^2` over the axis
pub fn get_energy(axis: &[f64], field: &[Complex64]) -> f64 {
    let power = get_power(field);
    trapz(axis, &power)
}

/// Unwrapped phase of the field in radians, re-zeroed at the center sample
pub fn get_phase(field: &[Complex64]) -> Vec<f64> {
    let mut phi: Vec<f64> = Vec::with_capacity(field.len());
    let mut prev_raw = 0.0;
    let mut prev = 0.0;
    for (i, a) in field.iter().enumerate() {
        let raw = a.arg();
        if i == 0 {
            phi.push(raw);
            prev_raw = raw;
            prev = raw;
            continue;
        }
        let d = raw - prev_raw;
        let wrapped = d - 2.0 * PI * (d / (2.0 * PI)).round();
        prev += wrapped;
        prev_raw = raw;
        phi.push(prev);
    }
    if !phi.is_empty() {
        let mid = phi[phi.len() / 2];
        for p in phi.iter_mut() {
            *p -= mid;
        }
    }
    phi
}

/// Local chirp in Hz: `-(1/2pi) * dphi/dt` from backward phase differences.
///
/// The left boundary repeats the first increment so the output matches the
/// field length.
pub fn get_chirp(t: &[f64], field: &[Complex64]) -> Vec<f64> {
    let phi = get_phase(field);
    let n = field.len();
    let mut chirp = vec![0.0; n];
    for i in 1..n {
        chirp[i] = -1.0 / (2.0 * PI) * (phi[i] - phi[i - 1]) / (t[i] - t[i - 1]);
    }
    if n >= 2 {
        chirp[0] = chirp[1];
    }
    chirp
}

/// Duration of the field from the RMS width of its power profile, scaled by
/// sqrt(2) so a Gaussian of 1/e amplitude half-width `tau` reports `tau`.
///
/// Returns 0 for an empty or zero-energy field.
pub fn rms_duration(t: &[f64], field: &[Complex64]) -> f64 {
    let power = get_power(field);
    let total: f64 = power.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let mean: f64 = t.iter().zip(&power).map(|(ti, p)| ti * p).sum::<f64>() / total;
    let var: f64 = t
        .iter()
        .zip(&power)
        .map(|(ti, p)| (ti - mean) * (ti - mean) * p)
        .sum::<f64>()
        / total;
    (2.0 * var).sqrt()
}

/// Normalized energy difference `sum |a-b|^2 / sum |a|^2` between two fields
/// on the same axis.
pub fn compare_field_energies(a: &[Complex64], b: &[Complex64]) -> f64 {
    let diff: f64 = a.iter().zip(b).map(|(x, y)| (x - y).norm_sqr()).sum();
    let reference: f64 = a.iter().map(|x| x.norm_sqr()).sum();
    diff / reference
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian(t: &[f64], amplitude: f64, tau: f64, chirp: f64) -> Vec<Complex64> {
        t.iter()
            .map(|ti| {
                let x = ti / tau;
                let re = -0.5 * x * x;
                Complex64::new(re, -0.5 * chirp * x * x).exp() * amplitude
            })
            .collect()
    }

    fn axis(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| (i as f64 - (n as f64 - 1.0) / 2.0) * dt).collect()
    }

    #[test]
    fn energy_of_gaussian_matches_closed_form() {
        let t = axis(1 << 12, 20e-15);
        let (amplitude, tau) = (2.0, 1e-12);
        let field = gaussian(&t, amplitude, tau, 0.0);
        // integral of A^2 exp(-t^2/tau^2) = A^2 tau sqrt(pi)
        let expected = amplitude * amplitude * tau * PI.sqrt();
        let energy = get_energy(&t, &field);
        assert!(
            ((energy - expected) / expected).abs() < 1e-10,
            "energy = {}, expected = {}",
            energy,
            expected
        );
    }

    #[test]
    fn chirped_gaussian_has_linear_chirp() {
        let t = axis(1 << 12, 20e-15);
        let (tau, c) = (1e-12, 3.0);
        let field = gaussian(&t, 1.0, tau, c);
        let chirp = get_chirp(&t, &field);
        // phi = -C t^2 / (2 tau^2)  =>  chirp = C t / (2 pi tau^2)
        let mid = t.len() / 2;
        for &i in &[mid - 100, mid, mid + 100] {
            let expected = c * t[i] / (2.0 * PI * tau * tau);
            assert!(
                (chirp[i] - expected).abs() < 1e-3 * (expected.abs() + 1.0),
                "chirp[{}] = {}, expected {}",
                i,
                chirp[i],
                expected
            );
        }
    }

    #[test]
    fn rms_duration_recovers_gaussian_width() {
        let t = axis(1 << 12, 20e-15);
        let tau = 1e-12;
        let field = gaussian(&t, 1.5, tau, 0.0);
        let d = rms_duration(&t, &field);
        assert!(((d - tau) / tau).abs() < 1e-6, "duration = {}", d);
    }

    #[test]
    fn phase_is_centered_on_middle_sample() {
        let t = axis(256, 1e-12);
        let field = gaussian(&t, 1.0, 20e-12, 1.0);
        let phi = get_phase(&field);
        assert_eq!(phi[t.len() / 2], 0.0);
    }

    #[test]
    fn identical_fields_compare_to_zero() {
        let t = axis(512, 1e-12);
        let field = gaussian(&t, 1.0, 5e-12, 0.0);
        assert_eq!(compare_field_energies(&field, &field), 0.0);
    }
}
