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

//! Axial step schedules for one fiber span
//!
//! The schedule is computed once per span, before propagation starts, from
//! the span parameters and the statistics of the field launched into it.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::SsfmError;
use crate::fiber::FiberSpan;
use crate::signal::InputSignal;

/// Default cap on the number of steps a schedule may produce
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Fixed schedules place all positions before the run; variable schedules
/// let the step grow along the span to exploit attenuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    Fixed,
    Variable,
}

impl fmt::Display for StepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepMode::Fixed => write!(f, "fixed"),
            StepMode::Variable => write!(f, "variable"),
        }
    }
}

impl FromStr for StepMode {
    type Err = SsfmError;

    fn from_str(s: &str) -> Result<StepMode, SsfmError> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(StepMode::Fixed),
            "variable" => Ok(StepMode::Variable),
            _ => Err(SsfmError::invalid_parameter("step_mode", s)),
        }
    }
}

/// How the step size is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepApproach {
    /// Uniform steps, count taken from the span's `number_of_steps`
    SpanCount,
    /// Uniform steps with an explicit count
    Count(usize),
    /// Nonlinear-phase step estimate with the temporal scale set by the
    /// pulse duration
    Cautious,
    /// Nonlinear-phase step estimate with the temporal scale set by the
    /// grid resolution
    Approx,
}

impl fmt::Display for StepApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepApproach::SpanCount => write!(f, "span_count"),
            StepApproach::Count(m) => write!(f, "{}", m),
            StepApproach::Cautious => write!(f, "cautious"),
            StepApproach::Approx => write!(f, "approx"),
        }
    }
}

impl FromStr for StepApproach {
    type Err = SsfmError;

    fn from_str(s: &str) -> Result<StepApproach, SsfmError> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "span_count" => Ok(StepApproach::SpanCount),
            "cautious" => Ok(StepApproach::Cautious),
            "approx" => Ok(StepApproach::Approx),
            _ => match lower.parse::<usize>() {
                Ok(m) => Ok(StepApproach::Count(m)),
                Err(_) => Err(SsfmError::invalid_parameter("step_approach", s)),
            },
        }
    }
}

/// Step configuration supplied per link run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    pub mode: StepMode,
    pub approach: StepApproach,
    /// Larger safety factor means smaller steps
    pub safety_factor: f64,
    /// Abort with [`SsfmError::ScheduleOverflow`] beyond this many steps
    pub max_steps: usize,
}

impl Default for StepConfig {
    fn default() -> StepConfig {
        StepConfig {
            mode: StepMode::Fixed,
            approach: StepApproach::SpanCount,
            safety_factor: 10.0,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl StepConfig {
    pub fn validate(&self) -> Result<(), SsfmError> {
        if !(self.safety_factor > 0.0) || !self.safety_factor.is_finite() {
            return Err(SsfmError::invalid_parameter(
                "safety_factor",
                self.safety_factor,
            ));
        }
        if self.max_steps < 1 {
            return Err(SsfmError::invalid_parameter("max_steps", self.max_steps));
        }
        match (self.mode, self.approach) {
            (StepMode::Fixed, StepApproach::Count(m)) if m < 1 => {
                Err(SsfmError::invalid_parameter("step count", m))
            }
            (StepMode::Variable, StepApproach::Count(_))
            | (StepMode::Variable, StepApproach::SpanCount) => Err(SsfmError::invalid_parameter(
                "step_approach",
                "variable mode needs a cautious or approx step estimate",
            )),
            _ => Ok(()),
        }
    }
}

/// Step size estimate at position `z_m` inside the span, before the safety
/// factor clamps of the schedule builder.
///
/// If either the nonlinearity or the group-velocity dispersion vanishes the
/// split operators commute and the whole span is one step.
pub fn zstep_nl(
    z_m: f64,
    span: &FiberSpan,
    signal: &InputSignal,
    approach: StepApproach,
    safety_factor: f64,
) -> f64 {
    if span.gamma == 0.0 || span.beta2() == 0.0 {
        return span.length;
    }
    let beta2 = span.beta2().abs();
    let peak_power = signal.peak_power;
    let duration = signal.duration;
    let growth = (2.0 * span.alpha_np_per_m * z_m).exp();
    let raw = match approach {
        StepApproach::Cautious => {
            let scale = span.gamma * peak_power * duration;
            beta2 * PI / (scale * scale) * growth / safety_factor
        }
        StepApproach::Approx => {
            let scale = span.gamma * peak_power;
            beta2 * PI / (scale * scale) / (duration * signal.time_freq.time_step()) * growth
                / safety_factor
        }
        // Uniform approaches have no z-dependent estimate
        StepApproach::SpanCount | StepApproach::Count(_) => span.length,
    };
    if !raw.is_finite() {
        return span.length;
    }
    // Clamp into the representable range of the span
    raw.min(span.length).max(span.length * f64::EPSILON)
}

/// Axial positions `z_0 = 0 < z_1 < ... < z_M = L` and the step sizes
/// between them. Immutable once computed; recomputing on unchanged inputs
/// is bit-identical.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSchedule {
    z: Vec<f64>,
    dz: Vec<f64>,
}

impl StepSchedule {
    /// Compute the schedule for one span and the signal launched into it
    pub fn for_span(
        span: &FiberSpan,
        signal: &InputSignal,
        config: &StepConfig,
    ) -> Result<StepSchedule, SsfmError> {
        config.validate()?;
        match (config.mode, config.approach) {
            (StepMode::Fixed, StepApproach::SpanCount) => {
                Ok(StepSchedule::uniform(span.length, span.number_of_steps))
            }
            (StepMode::Fixed, StepApproach::Count(m)) => {
                Ok(StepSchedule::uniform(span.length, m))
            }
            (StepMode::Fixed, approach) => {
                let dz = zstep_nl(0.0, span, signal, approach, config.safety_factor);
                StepSchedule::strided(span.length, dz, config.max_steps)
            }
            (StepMode::Variable, approach) => {
                StepSchedule::adaptive(span, signal, approach, config)
            }
        }
    }

    /// Uniform schedule of `m` steps covering `length`
    fn uniform(length: f64, m: usize) -> StepSchedule {
        let z: Vec<f64> = (0..=m)
            .map(|k| length * (k as f64 / m as f64))
            .collect();
        let dz: Vec<f64> = z.windows(2).map(|w| w[1] - w[0]).collect();
        StepSchedule { z, dz }
    }

    /// Positions at multiples of `stride` with the residual appended so the
    /// last position lands exactly on `length`
    fn strided(length: f64, stride: f64, max_steps: usize) -> Result<StepSchedule, SsfmError> {
        let mut z = vec![0.0];
        let mut current = stride;
        while current < length {
            z.push(current);
            if z.len() > max_steps {
                return Err(SsfmError::ScheduleOverflow { max_steps });
            }
            current += stride;
        }
        z.push(length);
        let dz: Vec<f64> = z.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(StepSchedule { z, dz })
    }

    /// Step grows with z to exploit attenuation
    fn adaptive(
        span: &FiberSpan,
        signal: &InputSignal,
        approach: StepApproach,
        config: &StepConfig,
    ) -> Result<StepSchedule, SsfmError> {
        let length = span.length;
        let mut z = vec![0.0];
        let mut dz = Vec::new();
        let mut current = 0.0;
        let mut step = zstep_nl(0.0, span, signal, approach, config.safety_factor);
        while current + step <= length {
            current += step;
            z.push(current);
            dz.push(step);
            if dz.len() >= config.max_steps {
                return Err(SsfmError::ScheduleOverflow {
                    max_steps: config.max_steps,
                });
            }
            step = zstep_nl(current, span, signal, approach, config.safety_factor);
        }
        if current < length {
            z.push(length);
            dz.push(length - current);
        }
        Ok(StepSchedule { z, dz })
    }

    /// Axial positions, `steps() + 1` entries starting at 0 and ending at
    /// the span length
    pub fn positions(&self) -> &[f64] {
        &self.z
    }

    /// Step sizes, all positive, summing to the span length
    pub fn step_sizes(&self) -> &[f64] {
        &self.dz
    }

    pub fn steps(&self) -> usize {
        self.dz.len()
    }

    pub fn total_length(&self) -> f64 {
        self.z[self.z.len() - 1]
    }
}
