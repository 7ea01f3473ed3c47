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

//! Split-step Fourier method solver for the generalized nonlinear
//! Schrödinger equation governing optical pulse propagation in single-mode
//! fibers: chromatic dispersion of any order, attenuation, Kerr self-phase
//! modulation and optionally self-steepening.
//!
//! Usage
//! -----
//! Build a grid, a link of fiber spans and an input signal, then propagate:
//!
//! ```
//! use std::sync::Arc;
//! use rand::SeedableRng;
//! use nlse_ssfm::{
//!     propagate_link, FiberLink, FiberSpan, InputSignal, PulseParameters,
//!     PulseType, StepConfig, TimeFreq, FREQ_1550_NM_HZ,
//! };
//!
//! // 1024 samples, 100 fs resolution, 1550 nm carrier
//! let time_freq = Arc::new(TimeFreq::new(1 << 10, 100e-15, FREQ_1550_NM_HZ).unwrap());
//! // 1 km of standard fiber, 64 steps
//! let span = FiberSpan::new(1.0e3, 64, 1.3e-3, vec![-21.7e-27], 0.0, false).unwrap();
//! let link = FiberLink::new(vec![span]).unwrap();
//! // 10 ps Gaussian, reproducible noise from an explicit seed
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let pulse = PulseParameters::new(0.5, 10e-12, PulseType::Gaussian);
//! let signal = InputSignal::new(time_freq, pulse, 1e-7, &mut rng).unwrap();
//!
//! let results = propagate_link(&link, &signal, &StepConfig::default()).unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].pulse_matrix.rows(), 65);
//! ```

mod error;
mod fiber;
mod field;
mod grid;
mod optics;
mod propagation;
mod signal;
mod stepping;
mod transforms;

pub mod persist;

pub use error::*;
pub use fiber::*;
pub use field::*;
pub use grid::*;
pub use optics::*;
pub use propagation::*;
pub use signal::*;
pub use stepping::*;
pub use transforms::*;
