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

//! A fundamental soliton riding through four dispersion lengths of lossless
//! anomalous fiber: peak power and width stay put while an ordinary pulse
//! of the same width would have spread fourfold.

use std::io::stdout;
use std::sync::Arc;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use nlse_ssfm::{
    peak_power, propagate_link, rms_duration, FiberLink, FiberSpan, InputSignal,
    PulseParameters, PulseType, StepConfig, TimeFreq, FREQ_1550_NM_HZ,
};

fn main() -> Result<()> {
    env_logger::init();

    let duration = 1e-12;
    let beta2: f64 = -20e-27;
    let gamma = 1.3e-3;
    // Fundamental soliton condition N = 1
    let peak = beta2.abs() / (gamma * duration * duration);
    let dispersion_length = duration * duration / beta2.abs();

    let time_freq = Arc::new(TimeFreq::new(1 << 12, 50e-15, FREQ_1550_NM_HZ)?);
    let span = FiberSpan::new(dispersion_length, 256, gamma, vec![beta2], 0.0, false)?;
    let link = FiberLink::new(vec![span; 4])?;

    let mut rng = StdRng::seed_from_u64(0);
    let params = PulseParameters::new(peak.sqrt(), duration, PulseType::Sech);
    let signal = InputSignal::new(time_freq.clone(), params, 1e-7, &mut rng)?;
    signal.describe(&mut stdout())?;
    println!(
        "N_soliton = {:.3}",
        link.spans[0].soliton_number(signal.duration, signal.peak_power)
    );

    println!("Propagating over 4 dispersion lengths...");
    let progress = indicatif::ProgressBar::new(link.len() as u64);
    let results = propagate_link(&link, &signal, &StepConfig::default())?;
    progress.inc(link.len() as u64);
    progress.finish();

    println!("\n  z/L_D   peak power [W]   width [ps]");
    println!(
        "  {:5.1}   {:14.4}   {:10.4}",
        0.0,
        signal.peak_power,
        rms_duration(time_freq.t(), &signal.field) * 1e12
    );
    for (i, result) in results.iter().enumerate() {
        println!(
            "  {:5.1}   {:14.4}   {:10.4}",
            (i + 1) as f64,
            peak_power(result.final_pulse()),
            rms_duration(time_freq.t(), result.final_pulse()) * 1e12
        );
    }
    Ok(())
}
