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

//! Fiber spans and links of concatenated spans

use std::f64::consts::LN_10;
use std::io::{self, Write};

use crate::error::SsfmError;

/// Parameters of one uniform piece of fiber.
///
/// Dispersion is a Taylor list: `beta_list[k]` holds the coefficient of
/// order `k+2` in s^(k+2)/m, so `beta_list[0]` is beta2 (group-velocity
/// dispersion) and `beta_list[1]` beta3. Treat a constructed span as
/// read-only.
#[derive(Debug, Clone)]
pub struct FiberSpan {
    /// Span length in m
    pub length: f64,
    /// Default number of fixed steps used when the step configuration does
    /// not override it
    pub number_of_steps: usize,
    /// Kerr nonlinearity in 1/W/m
    pub gamma: f64,
    /// Dispersion Taylor coefficients, beta2 first
    pub beta_list: Vec<f64>,
    /// Attenuation in dB/m
    pub alpha_db_per_m: f64,
    /// Attenuation in Np/m (amplitude loss rate), derived from dB/m
    pub alpha_np_per_m: f64,
    /// Total span loss in dB, `alpha_db_per_m * length`
    pub total_loss_db: f64,
    /// Include the self-steepening (optical shock) term in the nonlinear
    /// operator
    pub use_self_steepening: bool,
}

impl FiberSpan {
    pub fn new(
        length: f64,
        number_of_steps: usize,
        gamma: f64,
        beta_list: Vec<f64>,
        alpha_db_per_m: f64,
        use_self_steepening: bool,
    ) -> Result<FiberSpan, SsfmError> {
        if !(length > 0.0) || !length.is_finite() {
            return Err(SsfmError::invalid_parameter("length", length));
        }
        if number_of_steps < 1 {
            return Err(SsfmError::invalid_parameter(
                "number_of_steps",
                number_of_steps,
            ));
        }
        if !(gamma >= 0.0) || !gamma.is_finite() {
            return Err(SsfmError::invalid_parameter("gamma", gamma));
        }
        if beta_list.is_empty() {
            return Err(SsfmError::invalid_parameter("beta_list", "empty"));
        }
        if beta_list.iter().any(|b| !b.is_finite()) {
            return Err(SsfmError::invalid_parameter("beta_list", "non-finite entry"));
        }
        if !(alpha_db_per_m >= 0.0) || !alpha_db_per_m.is_finite() {
            return Err(SsfmError::invalid_parameter("alpha_db_per_m", alpha_db_per_m));
        }
        let alpha_np_per_m = alpha_db_per_m * LN_10 / 10.0;
        Ok(FiberSpan {
            length,
            number_of_steps,
            gamma,
            beta_list,
            alpha_db_per_m,
            alpha_np_per_m,
            total_loss_db: alpha_db_per_m * length,
            use_self_steepening,
        })
    }

    /// Group-velocity dispersion coefficient in s^2/m
    pub fn beta2(&self) -> f64 {
        self.beta_list[0]
    }

    /// Length over which loss reduces the accumulated nonlinearity:
    /// `(1 - exp(-alpha*L)) / alpha`, or `L` for a lossless span
    pub fn effective_length(&self) -> f64 {
        if self.alpha_np_per_m == 0.0 {
            self.length
        } else {
            (1.0 - (-self.alpha_np_per_m * self.length).exp()) / self.alpha_np_per_m
        }
    }

    /// Dispersion length `tau^2 / |beta2|` of a pulse with duration `tau`
    pub fn dispersion_length(&self, duration: f64) -> f64 {
        if self.beta2() == 0.0 {
            f64::INFINITY
        } else {
            duration * duration / self.beta2().abs()
        }
    }

    /// Nonlinear length `1 / (gamma * P)` at peak power `P`
    pub fn nonlinear_length(&self, peak_power: f64) -> f64 {
        if self.gamma == 0.0 || peak_power == 0.0 {
            f64::INFINITY
        } else {
            1.0 / (self.gamma * peak_power)
        }
    }

    /// Soliton number `sqrt(L_D / L_NL)` for a given launched pulse
    pub fn soliton_number(&self, duration: f64, peak_power: f64) -> f64 {
        (self.dispersion_length(duration) / self.nonlinear_length(peak_power)).sqrt()
    }

    /// Print a human-readable summary of the span
    pub fn describe(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, " ### Fiber span ###")?;
        writeln!(out, "  Length [km]          = {}", self.length / 1e3)?;
        writeln!(out, "  Default steps        = {}", self.number_of_steps)?;
        writeln!(out, "  gamma [1/W/m]        = {}", self.gamma)?;
        for (k, beta) in self.beta_list.iter().enumerate() {
            writeln!(
                out,
                "  beta{} [s^{}/m]       = {}",
                k + 2,
                k + 2,
                beta
            )?;
        }
        writeln!(out, "  alpha [dB/m]         = {}", self.alpha_db_per_m)?;
        writeln!(out, "  alpha [Np/m]         = {}", self.alpha_np_per_m)?;
        writeln!(out, "  Total loss [dB]      = {}", self.total_loss_db)?;
        writeln!(out, "  Self-steepening      = {}", self.use_self_steepening)?;
        writeln!(out)
    }
}

/// Ordered sequence of fiber spans traversed front to back
#[derive(Debug, Clone)]
pub struct FiberLink {
    pub spans: Vec<FiberSpan>,
}

impl FiberLink {
    pub fn new(spans: Vec<FiberSpan>) -> Result<FiberLink, SsfmError> {
        if spans.is_empty() {
            return Err(SsfmError::invalid_parameter("spans", "empty link"));
        }
        Ok(FiberLink { spans })
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Total length of the link in m
    pub fn total_length(&self) -> f64 {
        self.spans.iter().map(|s| s.length).sum()
    }

    pub fn describe(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, " ### Fiber link of {} span(s) ###", self.len())?;
        for span in &self.spans {
            span.describe(out)?;
        }
        Ok(())
    }
}
