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

//! Discretized time axis and its dual frequency axis

use std::f64::consts::PI;
use std::io::{self, Write};

use crate::error::SsfmError;

/// Time/frequency grid shared by the signal, the propagators and the results.
///
/// The time axis has `number_of_points` samples at spacing `time_step`,
/// recentered so that its mean is exactly zero. The frequency axis is the
/// zero-centered (shifted) DFT frequency set of the same length; frequencies
/// are relative to `center_frequency`, the absolute carrier the simulation
/// window is attached to.
///
/// Both axes never change after construction; share the grid via
/// `Arc<TimeFreq>`.
#[derive(Debug, Clone)]
pub struct TimeFreq {
    number_of_points: usize,
    time_step: f64,
    center_frequency: f64,
    t: Vec<f64>,
    f: Vec<f64>,
}

impl TimeFreq {
    /// Build a grid of `n` samples with time resolution `dt` (seconds)
    /// around the absolute carrier frequency `center_frequency_hz`.
    pub fn new(n: usize, dt: f64, center_frequency_hz: f64) -> Result<TimeFreq, SsfmError> {
        if n < 2 {
            return Err(SsfmError::invalid_parameter("number_of_points", n));
        }
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(SsfmError::invalid_parameter("time_step", dt));
        }
        if !(center_frequency_hz > 0.0) || !center_frequency_hz.is_finite() {
            return Err(SsfmError::invalid_parameter(
                "center_frequency_hz",
                center_frequency_hz,
            ));
        }
        let half = (n as f64 - 1.0) / 2.0;
        let t: Vec<f64> = (0..n).map(|i| (i as f64 - half) * dt).collect();
        let df = 1.0 / (n as f64 * dt);
        // Shifted DFT frequency order: -N/2 .. N/2-1 in units of df
        let f: Vec<f64> = (0..n).map(|i| (i as f64 - (n / 2) as f64) * df).collect();
        Ok(TimeFreq {
            number_of_points: n,
            time_step: dt,
            center_frequency: center_frequency_hz,
            t,
            f,
        })
    }

    pub fn number_of_points(&self) -> usize {
        self.number_of_points
    }

    /// Time resolution in seconds
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Frequency resolution in Hz, `1/(N*dt)`
    pub fn freq_step(&self) -> f64 {
        1.0 / (self.number_of_points as f64 * self.time_step)
    }

    /// Absolute carrier frequency in Hz
    pub fn center_frequency(&self) -> f64 {
        self.center_frequency
    }

    /// Angular carrier frequency `2*pi*f_c` in rad/s
    pub fn center_angular_frequency(&self) -> f64 {
        2.0 * PI * self.center_frequency
    }

    /// Time axis in seconds, mean exactly zero
    pub fn t(&self) -> &[f64] {
        &self.t
    }

    /// Relative (baseband) frequency axis in Hz, zero-centered DFT order
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    pub fn t_min(&self) -> f64 {
        self.t[0]
    }

    pub fn t_max(&self) -> f64 {
        self.t[self.number_of_points - 1]
    }

    pub fn f_min(&self) -> f64 {
        self.f[0]
    }

    pub fn f_max(&self) -> f64 {
        self.f[self.number_of_points - 1]
    }

    /// Absolute frequency axis `f + f_center` in Hz
    pub fn absolute_frequencies(&self) -> Vec<f64> {
        self.f.iter().map(|f| f + self.center_frequency).collect()
    }

    /// Print a human-readable summary of the grid
    pub fn describe(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, " ### Time/frequency grid ###")?;
        writeln!(out, "  Number of points      = {}", self.number_of_points)?;
        writeln!(out, "  Start time, tmin      = {:.3} ps", self.t_min() * 1e12)?;
        writeln!(out, "  Stop time, tmax       = {:.3} ps", self.t_max() * 1e12)?;
        writeln!(out, "  Time resolution       = {:.3} ps", self.time_step * 1e12)?;
        writeln!(out)?;
        writeln!(
            out,
            "  Center frequency      = {:.3} THz",
            self.center_frequency / 1e12
        )?;
        writeln!(out, "  Start frequency       = {:.3} THz", self.f_min() / 1e12)?;
        writeln!(out, "  Stop frequency        = {:.3} THz", self.f_max() / 1e12)?;
        writeln!(
            out,
            "  Frequency resolution  = {:.3} MHz",
            self.freq_step() / 1e6
        )?;
        writeln!(out)
    }
}
