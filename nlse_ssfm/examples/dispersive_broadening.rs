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

//! A 10 ps Gaussian spreading over 100 km of standard single-mode fiber,
//! driven span by span so the width growth at each boundary is visible.
//! The run configuration is saved as tabular snapshots in the working
//! directory.

use std::fs::File;
use std::io::stdout;
use std::sync::Arc;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use nlse_ssfm::persist;
use nlse_ssfm::{
    describe_run, rms_duration, FiberLink, FiberSpan, InputSignal, PulseParameters, PulseType,
    SpanPropagator, SpectralTransform, StepConfig, StepSchedule, TimeFreq, FREQ_1550_NM_HZ,
};

fn main() -> Result<()> {
    env_logger::init();

    const SPANS: usize = 10;
    let time_freq = Arc::new(TimeFreq::new(1 << 14, 250e-15, FREQ_1550_NM_HZ)?);
    let span = FiberSpan::new(10e3, 50, 0.0, vec![-21.7e-27], 0.2e-3, false)?;
    let link = FiberLink::new(vec![span; SPANS])?;
    let config = StepConfig::default();

    let mut rng = StdRng::seed_from_u64(0);
    let params = PulseParameters::new(1.0, 10e-12, PulseType::Gaussian);
    let signal = InputSignal::new(time_freq.clone(), params.clone(), 1e-7, &mut rng)?;

    let out = &mut stdout();
    time_freq.describe(out)?;
    link.describe(out)?;
    signal.describe(out)?;

    // Snapshot the run configuration for later reloading
    persist::save_time_freq(&time_freq, &mut File::create("time_freq.csv")?)?;
    persist::save_fiber_link(&link, &mut File::create("fiber_link.csv")?)?;
    persist::save_pulse_parameters(&params, &mut File::create("pulse.csv")?)?;
    persist::save_step_config(&config, &mut File::create("steps.csv")?)?;

    println!("Propagating...");
    let mut transform = SpectralTransform::new(time_freq.clone(), signal.fft_tol)?;
    let mut current = signal;
    let mut widths = vec![rms_duration(time_freq.t(), &current.field)];
    let progress = indicatif::ProgressBar::new(SPANS as u64);
    for span in &link.spans {
        let schedule = StepSchedule::for_span(span, &current, &config)?;
        describe_run(span, &current, &schedule, out)?;
        let propagator = SpanPropagator::new(span.clone(), &current, schedule);
        let result = propagator.run(&mut transform)?;
        widths.push(rms_duration(time_freq.t(), result.final_pulse()));
        current = InputSignal::from_field(
            time_freq.clone(),
            params.clone(),
            result.final_pulse().to_vec(),
            current.fft_tol,
        )?;
        progress.inc(1);
    }
    progress.finish();

    println!("\n  z [km]   width [ps]");
    for (i, width) in widths.iter().enumerate() {
        println!("  {:6.1}   {:10.3}", i as f64 * 10.0, width * 1e12);
    }
    Ok(())
}
