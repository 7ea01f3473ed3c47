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

//! Physical constants and unit conversions for fiber optics

use std::f64::consts::PI;

/// Speed of light in vacuum, m/s
pub const SPEED_OF_LIGHT_M_PER_S: f64 = 299_792_458.0;

/// Frequency of 1550 nm light, the usual telecom carrier, in Hz
pub const FREQ_1550_NM_HZ: f64 = SPEED_OF_LIGHT_M_PER_S / 1550.0e-9;

/// Vacuum wavelength in m of light at `freq_hz`
pub fn freq_to_wavelength(freq_hz: f64) -> f64 {
    SPEED_OF_LIGHT_M_PER_S / freq_hz
}

/// Frequency in Hz of light with vacuum wavelength `wavelength_m`
pub fn wavelength_to_freq(wavelength_m: f64) -> f64 {
    SPEED_OF_LIGHT_M_PER_S / wavelength_m
}

/// Kerr nonlinearity coefficient in 1/W/m from the nonlinear index
/// `n2` (m^2/W) and the mode field diameter of a step-index fiber:
/// `gamma = 2*pi*n2 / (lambda * A_eff)` with `A_eff = pi*(d/2)^2`.
pub fn gamma_from_fiber_params(
    wavelength_m: f64,
    n2_m2_per_w: f64,
    core_diameter_m: f64,
) -> f64 {
    let radius = core_diameter_m / 2.0;
    let effective_area = PI * radius * radius;
    2.0 * PI * n2_m2_per_w / (wavelength_m * effective_area)
}
