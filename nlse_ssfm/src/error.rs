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

//! Error types shared across the solver

use std::fmt;

use thiserror::Error;

use crate::persist::PersistenceError;

/// Direction of an energy-audited Fourier transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformDirection {
    PulseToSpectrum,
    SpectrumToPulse,
}

impl fmt::Display for TransformDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformDirection::PulseToSpectrum => write!(f, "pulse-to-spectrum"),
            TransformDirection::SpectrumToPulse => write!(f, "spectrum-to-pulse"),
        }
    }
}

/// All failure modes of the solver.
///
/// The `step` fields refer to the result row the failing operation was
/// producing: row 0 is the launched field, row `k` the field after `k`
/// completed steps.
#[derive(Error, Debug)]
pub enum SsfmError {
    /// A constructor or configuration value violates its invariant
    #[error("invalid parameter: {what} = {value}")]
    InvalidParameter { what: String, value: String },

    /// Energy changed across a transform boundary by more than the tolerance
    #[error(
        "energy mismatch in {direction} transform at step {step}: \
         relative error {relative_error:e} exceeds tolerance {tolerance:e}"
    )]
    EnergyMismatch {
        direction: TransformDirection,
        step: usize,
        relative_error: f64,
        tolerance: f64,
    },

    /// A NaN or infinity appeared in the field or spectrum mid-run
    #[error("numerical instability at step {step}: non-finite value in {what}")]
    NumericalInstability { step: usize, what: String },

    /// The variable-step loop would exceed the configured maximum step count
    #[error("step schedule would exceed {max_steps} steps")]
    ScheduleOverflow { max_steps: usize },

    /// A snapshot loader hit a missing or malformed column
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl SsfmError {
    pub(crate) fn invalid_parameter(what: &str, value: impl fmt::Display) -> SsfmError {
        SsfmError::InvalidParameter {
            what: what.to_string(),
            value: value.to_string(),
        }
    }

    /// Attach the result row index to errors raised inside a propagation step
    pub(crate) fn at_step(mut self, row: usize) -> SsfmError {
        match &mut self {
            SsfmError::EnergyMismatch { step, .. } => *step = row,
            SsfmError::NumericalInstability { step, .. } => *step = row,
            _ => {}
        }
        self
    }
}
