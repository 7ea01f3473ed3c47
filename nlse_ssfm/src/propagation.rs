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

//! Split-step propagation through spans and links
//!
//! Each step applies the nonlinear operator in the time domain, crosses
//! into the frequency domain through the energy-audited transform, applies
//! the precomputed dispersion-and-loss operator, and crosses back. The
//! field after every step is recorded in the result matrices.

use std::f64::consts::PI;
use std::io::{self, Write};

use log::{debug, info};
use num_complex::Complex64;
use num_traits::Zero;
use thiserror::Error;

use crate::error::SsfmError;
use crate::fiber::{FiberLink, FiberSpan};
use crate::signal::InputSignal;
use crate::stepping::{StepConfig, StepSchedule};
use crate::transforms::SpectralTransform;

/// Row-major matrix of complex field samples, one row per recorded axial
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Complex64>,
}

impl FieldMatrix {
    fn zeros(rows: usize, cols: usize) -> FieldMatrix {
        FieldMatrix {
            rows,
            cols,
            data: vec![Complex64::zero(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Field samples at the `r`-th recorded axial position
    pub fn row(&self, r: usize) -> &[Complex64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    fn row_mut(&mut self, r: usize) -> &mut [Complex64] {
        &mut self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn last_row(&self) -> &[Complex64] {
        self.row(self.rows - 1)
    }
}

/// Everything recorded while propagating through one span: the launched
/// signal, the span, the schedule, and the pulse/spectrum evolution
/// matrices with row `k` holding the field after `k` completed steps.
#[derive(Debug, Clone)]
pub struct SsfmResult {
    pub input_signal: InputSignal,
    pub fiber: FiberSpan,
    pub schedule: StepSchedule,
    pub pulse_matrix: FieldMatrix,
    pub spectrum_matrix: FieldMatrix,
}

impl SsfmResult {
    /// Time-domain field leaving the span
    pub fn final_pulse(&self) -> &[Complex64] {
        self.pulse_matrix.last_row()
    }

    /// Spectrum leaving the span
    pub fn final_spectrum(&self) -> &[Complex64] {
        self.spectrum_matrix.last_row()
    }
}

/// Lifecycle of a span propagator; a propagator is single-use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagatorState {
    Ready,
    Stepping,
    Done,
}

/// Advances a field from z = 0 to z = L of one span, recording every step.
///
/// Consuming `run` makes the propagator unrestartable once done.
pub struct SpanPropagator {
    /// Per-unit-length linear operator D(f) on the grid's frequency axis
    linear_operator: Vec<Complex64>,
    state: PropagatorState,
    result: SsfmResult,
}

impl SpanPropagator {
    pub fn new(span: FiberSpan, signal: &InputSignal, schedule: StepSchedule) -> SpanPropagator {
        let n = signal.time_freq.number_of_points();
        let rows = schedule.steps() + 1;
        let mut pulse_matrix = FieldMatrix::zeros(rows, n);
        let mut spectrum_matrix = FieldMatrix::zeros(rows, n);
        pulse_matrix.row_mut(0).copy_from_slice(&signal.field);
        spectrum_matrix.row_mut(0).copy_from_slice(&signal.spectrum);
        let linear_operator = linear_operator(&span, signal.time_freq.f());
        SpanPropagator {
            linear_operator,
            state: PropagatorState::Ready,
            result: SsfmResult {
                input_signal: signal.clone(),
                fiber: span,
                schedule,
                pulse_matrix,
                spectrum_matrix,
            },
        }
    }

    pub fn state(&self) -> PropagatorState {
        self.state
    }

    /// Run all steps of the schedule. Errors abort the run and discard the
    /// partially filled matrices.
    pub fn run(mut self, transform: &mut SpectralTransform) -> Result<SsfmResult, SsfmError> {
        let gamma = self.result.fiber.gamma;
        let use_self_steepening = self.result.fiber.use_self_steepening;
        let w0 = self.result.input_signal.time_freq.center_angular_frequency();
        let mut pulse = self.result.pulse_matrix.row(0).to_vec();
        let mut linear_factor: Vec<Complex64> = Vec::new();
        let mut cached_dz = f64::NAN;
        let step_sizes = self.result.schedule.step_sizes().to_vec();
        for (k, &dz) in step_sizes.iter().enumerate() {
            self.state = PropagatorState::Stepping;
            let row = k + 1;

            // Nonlinear kick in the time domain
            if gamma != 0.0 {
                if use_self_steepening {
                    rk4_nonlinear_step(&mut pulse, dz, gamma, w0, transform);
                } else {
                    for a in pulse.iter_mut() {
                        *a = *a * Complex64::from_polar(1.0, gamma * a.norm_sqr() * dz);
                    }
                }
            }

            // Dispersion and loss in the frequency domain
            let mut spectrum = transform
                .spectrum_from_pulse(&pulse)
                .map_err(|e| e.at_step(row))?;
            if dz != cached_dz {
                linear_factor = self
                    .linear_operator
                    .iter()
                    .map(|d| (*d * dz).exp())
                    .collect();
                cached_dz = dz;
            }
            for (s, f) in spectrum.iter_mut().zip(&linear_factor) {
                *s = *s * *f;
            }
            pulse = transform
                .pulse_from_spectrum(&spectrum)
                .map_err(|e| e.at_step(row))?;

            ensure_finite(&pulse, row, "pulse")?;
            ensure_finite(&spectrum, row, "spectrum")?;
            self.result.pulse_matrix.row_mut(row).copy_from_slice(&pulse);
            self.result
                .spectrum_matrix
                .row_mut(row)
                .copy_from_slice(&spectrum);
        }
        self.state = PropagatorState::Done;
        Ok(self.result)
    }
}

/// Per-unit-length linear operator
/// `D(f) = i * sum_k beta_k (-omega)^k / k!  -  alpha_Np/2`, omega = 2*pi*f.
///
/// The DFT reconstructs the envelope with an `exp(+i omega t)` kernel while
/// the physical carrier convention expands beta over `exp(-i omega t)`
/// components, so odd dispersion orders enter mirrored. This is what makes
/// a negative beta3 put the Airy oscillations on the leading edge.
fn linear_operator(span: &FiberSpan, f: &[f64]) -> Vec<Complex64> {
    let loss = -span.alpha_np_per_m / 2.0;
    f.iter()
        .map(|&fi| {
            let momega = -2.0 * PI * fi;
            let mut power = momega * momega;
            let mut factorial = 2.0;
            let mut phase = 0.0;
            for (k, &beta) in span.beta_list.iter().enumerate() {
                if k > 0 {
                    power *= momega;
                    factorial *= (k + 2) as f64;
                }
                phase += beta * power / factorial;
            }
            Complex64::new(loss, phase)
        })
        .collect()
}

/// Full nonlinear operator with the shock term:
/// `N(A) = i*gamma*|A|^2*A - (gamma/omega0)*d/dt(|A|^2*A)`
fn nonlinear_rhs(
    a: &[Complex64],
    gamma: f64,
    w0: f64,
    transform: &mut SpectralTransform,
) -> Vec<Complex64> {
    let cubed: Vec<Complex64> = a.iter().map(|x| *x * x.norm_sqr()).collect();
    let shock = transform.time_derivative(&cubed);
    cubed
        .iter()
        .zip(shock)
        .map(|(c, d)| Complex64::new(0.0, gamma) * *c - d * (gamma / w0))
        .collect()
}

/// Classical fourth-order Runge-Kutta sub-integration of the nonlinear
/// operator over one step. With self-steepening the operator has no
/// closed-form exponential, and a first-order kick would dominate the
/// split error.
fn rk4_nonlinear_step(
    pulse: &mut [Complex64],
    dz: f64,
    gamma: f64,
    w0: f64,
    transform: &mut SpectralTransform,
) {
    let stage = |a: &[Complex64], k: &[Complex64], h: f64| -> Vec<Complex64> {
        a.iter().zip(k).map(|(ai, ki)| *ai + *ki * h).collect()
    };
    let k1 = nonlinear_rhs(pulse, gamma, w0, transform);
    let k2 = nonlinear_rhs(&stage(pulse, &k1, 0.5 * dz), gamma, w0, transform);
    let k3 = nonlinear_rhs(&stage(pulse, &k2, 0.5 * dz), gamma, w0, transform);
    let k4 = nonlinear_rhs(&stage(pulse, &k3, dz), gamma, w0, transform);
    for (i, a) in pulse.iter_mut().enumerate() {
        *a = *a + (k1[i] + (k2[i] + k3[i]) * 2.0 + k4[i]) * (dz / 6.0);
    }
}

fn ensure_finite(buf: &[Complex64], row: usize, what: &str) -> Result<(), SsfmError> {
    if buf.iter().any(|c| !c.re.is_finite() || !c.im.is_finite()) {
        return Err(SsfmError::NumericalInstability {
            step: row,
            what: what.to_string(),
        });
    }
    Ok(())
}

/// Failure of a link run: the error, the span it occurred in, and the
/// results of all spans that completed before it.
#[derive(Error, Debug)]
#[error("propagation failed in span {span_index}: {source}")]
pub struct LinkError {
    pub span_index: usize,
    #[source]
    pub source: SsfmError,
    pub completed: Vec<SsfmResult>,
}

/// Propagate a signal through every span of a link in order.
///
/// The schedule of each span is derived from the peak power and duration of
/// the field actually entering it; the output field of span `i` is the
/// input of span `i + 1`. Aborts on the first failure, returning the
/// results of the spans that already completed alongside the error.
pub fn propagate_link(
    link: &FiberLink,
    input_signal: &InputSignal,
    config: &StepConfig,
) -> Result<Vec<SsfmResult>, LinkError> {
    let mut results: Vec<SsfmResult> = Vec::with_capacity(link.len());
    let fail = |span_index, source, completed| LinkError {
        span_index,
        source,
        completed,
    };
    if let Err(e) = config.validate() {
        return Err(fail(0, e, results));
    }
    let mut transform =
        match SpectralTransform::new(input_signal.time_freq.clone(), input_signal.fft_tol) {
            Ok(t) => t,
            Err(e) => return Err(fail(0, e, results)),
        };
    let mut current = input_signal.clone();
    info!("propagating through {} span(s)", link.len());
    for (i, span) in link.spans.iter().enumerate() {
        let schedule = match StepSchedule::for_span(span, &current, config) {
            Ok(s) => s,
            Err(e) => return Err(fail(i, e, results)),
        };
        debug!(
            "span {}: {} steps over {} m (peak power {:.3} W, duration {:.3e} s)",
            i,
            schedule.steps(),
            span.length,
            current.peak_power,
            current.duration
        );
        let propagator = SpanPropagator::new(span.clone(), &current, schedule);
        let result = match propagator.run(&mut transform) {
            Ok(r) => r,
            Err(e) => return Err(fail(i, e, results)),
        };
        current = current.advanced(
            result.final_pulse().to_vec(),
            result.final_spectrum().to_vec(),
        );
        results.push(result);
        info!("span {} done", i);
    }
    Ok(results)
}

/// Print the characteristic length scales of a span run: effective length,
/// dispersion and nonlinear lengths, soliton number and the step range.
pub fn describe_run(
    span: &FiberSpan,
    signal: &InputSignal,
    schedule: &StepSchedule,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(out, " ### Characteristic parameters of the run ###")?;
    writeln!(out, "  Span length     = {:.3e} m", span.length)?;
    if span.alpha_np_per_m > 0.0 {
        writeln!(out, "  L_eff           = {:.3e} m", span.effective_length())?;
    }
    let l_d = span.dispersion_length(signal.duration);
    let l_nl = span.nonlinear_length(signal.peak_power);
    writeln!(out, "  L_D             = {:.3e} m", l_d)?;
    writeln!(out, "  L_NL            = {:.3e} m", l_nl)?;
    let n_soliton = span.soliton_number(signal.duration, signal.peak_power);
    writeln!(out, "  N_soliton       = {:.3e}", n_soliton)?;
    if span.beta2() < 0.0 {
        writeln!(
            out,
            "  beta2 < 0: solitons and modulation instability are possible"
        )?;
    }
    let dz = schedule.step_sizes();
    let dz_max = dz.iter().fold(0.0f64, |a, &b| a.max(b));
    let dz_min = dz.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    writeln!(out, "  Steps           = {}", schedule.steps())?;
    writeln!(out, "  Max dz          = {:.3e} m", dz_max)?;
    writeln!(out, "  Min dz          = {:.3e} m", dz_min)?;
    writeln!(out)
}
