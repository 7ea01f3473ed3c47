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

//! Human-readable tabular snapshots of run configurations
//!
//! Grids, fiber links, pulse parameters and step configurations are written
//! as named-column CSV text and read back with column presence and cell
//! types validated. The module only touches `io::Read`/`io::Write` sinks;
//! where the bytes live is the caller's business.

use std::io::{self, Read, Write};
use std::str::FromStr;

use thiserror::Error;

use crate::error::SsfmError;
use crate::fiber::{FiberLink, FiberSpan};
use crate::grid::TimeFreq;
use crate::signal::{PulseParameters, PulseType};
use crate::stepping::{StepApproach, StepConfig, StepMode};

/// Failure while writing or reading a snapshot table
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("table has no data rows")]
    EmptyTable,
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("malformed value '{value}' in column '{column}'")]
    MalformedValue { column: String, value: String },
    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
}

/// Minimal named-column table of string cells
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<&str>) -> Table {
        Table {
            columns: columns.into_iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(cells);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn to_writer(&self, out: &mut dyn Write) -> Result<(), PersistenceError> {
        writeln!(out, "{}", self.columns.join(","))?;
        for row in &self.rows {
            writeln!(out, "{}", row.join(","))?;
        }
        Ok(())
    }

    pub fn from_reader(input: &mut dyn Read) -> Result<Table, PersistenceError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines.next().ok_or(PersistenceError::EmptyTable)?;
        let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();
        let mut rows = Vec::new();
        for (i, line) in lines.enumerate() {
            let cells: Vec<String> = line.split(',').map(|c| c.trim().to_string()).collect();
            if cells.len() != columns.len() {
                return Err(PersistenceError::RaggedRow {
                    row: i,
                    got: cells.len(),
                    expected: columns.len(),
                });
            }
            rows.push(cells);
        }
        if rows.is_empty() {
            return Err(PersistenceError::EmptyTable);
        }
        Ok(Table { columns, rows })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    fn column_index(&self, name: &str) -> Result<usize, PersistenceError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PersistenceError::MissingColumn(name.to_string()))
    }

    pub fn get_str(&self, row: usize, column: &str) -> Result<&str, PersistenceError> {
        let idx = self.column_index(column)?;
        Ok(&self.rows[row][idx])
    }

    pub fn get_f64(&self, row: usize, column: &str) -> Result<f64, PersistenceError> {
        let cell = self.get_str(row, column)?;
        cell.parse().map_err(|_| PersistenceError::MalformedValue {
            column: column.to_string(),
            value: cell.to_string(),
        })
    }

    pub fn get_usize(&self, row: usize, column: &str) -> Result<usize, PersistenceError> {
        let cell = self.get_str(row, column)?;
        cell.parse().map_err(|_| PersistenceError::MalformedValue {
            column: column.to_string(),
            value: cell.to_string(),
        })
    }

    pub fn get_bool(&self, row: usize, column: &str) -> Result<bool, PersistenceError> {
        let cell = self.get_str(row, column)?;
        cell.parse().map_err(|_| PersistenceError::MalformedValue {
            column: column.to_string(),
            value: cell.to_string(),
        })
    }
}

fn beta_column(order_index: usize) -> String {
    format!("beta{}_s{}_per_m", order_index + 2, order_index + 2)
}

/// Exponential notation keeps the cells short; the shortest-round-trip
/// digit generation preserves every value exactly.
fn float_cell(x: f64) -> String {
    format!("{:e}", x)
}

/// Write the grid parameters needed to reconstruct a [`TimeFreq`]
pub fn save_time_freq(tf: &TimeFreq, out: &mut dyn Write) -> Result<(), PersistenceError> {
    let mut table = Table::new(vec!["number_of_points", "dt_s", "center_frequency_Hz"]);
    table.push_row(vec![
        tf.number_of_points().to_string(),
        float_cell(tf.time_step()),
        float_cell(tf.center_frequency()),
    ]);
    table.to_writer(out)
}

/// Reconstruct a [`TimeFreq`] from a snapshot written by [`save_time_freq`]
pub fn load_time_freq(input: &mut dyn Read) -> Result<TimeFreq, SsfmError> {
    let table = Table::from_reader(input)?;
    let n = table.get_usize(0, "number_of_points")?;
    let dt = table.get_f64(0, "dt_s")?;
    let center = table.get_f64(0, "center_frequency_Hz")?;
    TimeFreq::new(n, dt, center)
}

/// Write one row per span of the link
pub fn save_fiber_link(link: &FiberLink, out: &mut dyn Write) -> Result<(), PersistenceError> {
    let max_orders = link
        .spans
        .iter()
        .map(|s| s.beta_list.len())
        .max()
        .unwrap_or(1);
    let beta_names: Vec<String> = (0..max_orders).map(beta_column).collect();
    let mut columns = vec![
        "length_m",
        "number_of_steps",
        "gamma_per_W_per_m",
        "number_of_beta_orders",
    ];
    for name in &beta_names {
        columns.push(name.as_str());
    }
    columns.push("alpha_dB_per_m");
    columns.push("self_steepening");
    let mut table = Table::new(columns);
    for span in &link.spans {
        let mut row = vec![
            float_cell(span.length),
            span.number_of_steps.to_string(),
            float_cell(span.gamma),
            span.beta_list.len().to_string(),
        ];
        for k in 0..max_orders {
            row.push(float_cell(span.beta_list.get(k).copied().unwrap_or(0.0)));
        }
        row.push(float_cell(span.alpha_db_per_m));
        row.push(span.use_self_steepening.to_string());
        table.push_row(row);
    }
    table.to_writer(out)
}

/// Reconstruct a [`FiberLink`] from a snapshot written by [`save_fiber_link`]
pub fn load_fiber_link(input: &mut dyn Read) -> Result<FiberLink, SsfmError> {
    let table = Table::from_reader(input)?;
    let mut spans = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        let orders = table.get_usize(row, "number_of_beta_orders")?;
        let mut beta_list = Vec::with_capacity(orders);
        for k in 0..orders {
            beta_list.push(table.get_f64(row, &beta_column(k))?);
        }
        spans.push(FiberSpan::new(
            table.get_f64(row, "length_m")?,
            table.get_usize(row, "number_of_steps")?,
            table.get_f64(row, "gamma_per_W_per_m")?,
            beta_list,
            table.get_f64(row, "alpha_dB_per_m")?,
            table.get_bool(row, "self_steepening")?,
        )?);
    }
    FiberLink::new(spans)
}

/// Write the pulse parameters of the launched signal
pub fn save_pulse_parameters(
    params: &PulseParameters,
    out: &mut dyn Write,
) -> Result<(), PersistenceError> {
    let mut table = Table::new(vec![
        "peak_amplitude_sqrt_W",
        "duration_s",
        "offset_s",
        "chirp",
        "carrier_freq_offset_Hz",
        "pulse_type",
        "order",
        "noise_amplitude_sqrt_W",
    ]);
    table.push_row(vec![
        float_cell(params.peak_amplitude),
        float_cell(params.duration),
        float_cell(params.time_offset),
        float_cell(params.chirp),
        float_cell(params.carrier_freq_offset),
        params.pulse_type.to_string(),
        params.order.to_string(),
        float_cell(params.noise_amplitude),
    ]);
    table.to_writer(out)
}

/// Reconstruct [`PulseParameters`] from a snapshot written by
/// [`save_pulse_parameters`]
pub fn load_pulse_parameters(input: &mut dyn Read) -> Result<PulseParameters, SsfmError> {
    let table = Table::from_reader(input)?;
    let pulse_type = PulseType::from_str(table.get_str(0, "pulse_type")?)?;
    let order_value = table.get_usize(0, "order")?;
    let params = PulseParameters {
        peak_amplitude: table.get_f64(0, "peak_amplitude_sqrt_W")?,
        duration: table.get_f64(0, "duration_s")?,
        time_offset: table.get_f64(0, "offset_s")?,
        chirp: table.get_f64(0, "chirp")?,
        carrier_freq_offset: table.get_f64(0, "carrier_freq_offset_Hz")?,
        pulse_type,
        order: order_value as u32,
        noise_amplitude: table.get_f64(0, "noise_amplitude_sqrt_W")?,
    };
    params.validate()?;
    Ok(params)
}

/// Write the step configuration of a run
pub fn save_step_config(config: &StepConfig, out: &mut dyn Write) -> Result<(), PersistenceError> {
    let mut table = Table::new(vec![
        "step_mode",
        "step_approach",
        "safety_factor",
        "max_steps",
    ]);
    table.push_row(vec![
        config.mode.to_string(),
        config.approach.to_string(),
        float_cell(config.safety_factor),
        config.max_steps.to_string(),
    ]);
    table.to_writer(out)
}

/// Reconstruct a [`StepConfig`] from a snapshot written by
/// [`save_step_config`]
pub fn load_step_config(input: &mut dyn Read) -> Result<StepConfig, SsfmError> {
    let table = Table::from_reader(input)?;
    let config = StepConfig {
        mode: StepMode::from_str(table.get_str(0, "step_mode")?)?,
        approach: StepApproach::from_str(table.get_str(0, "step_approach")?)?,
        safety_factor: table.get_f64(0, "safety_factor")?,
        max_steps: table.get_usize(0, "max_steps")?,
    };
    config.validate()?;
    Ok(config)
}
