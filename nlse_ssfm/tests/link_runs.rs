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

//! Multi-span behavior: composition, determinism, loss bookkeeping and
//! soliton-preserving propagation

use std::sync::Arc;

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;

use nlse_ssfm::{
    compare_field_energies, get_energy, propagate_link, FiberLink, FiberSpan, InputSignal,
    PulseParameters, PulseType, StepApproach, StepConfig, StepMode, TimeFreq, FREQ_1550_NM_HZ,
};

#[test]
fn two_spans_compose_like_one_double_span() {
    let time_freq = Arc::new(TimeFreq::new(1 << 13, 100e-15, FREQ_1550_NM_HZ).unwrap());
    let mut rng = StdRng::seed_from_u64(0);
    let params = PulseParameters::new(0.25, 12e-12, PulseType::Gaussian);
    let signal = InputSignal::new(time_freq.clone(), params, 1e-7, &mut rng).unwrap();

    let beta2 = -10.66e-26;
    let half = FiberSpan::new(6e3, 32, 0.0, vec![beta2], 0.0, false).unwrap();
    let full = FiberSpan::new(12e3, 64, 0.0, vec![beta2], 0.0, false).unwrap();

    let split_link = FiberLink::new(vec![half.clone(), half]).unwrap();
    let single_link = FiberLink::new(vec![full]).unwrap();

    let split = propagate_link(&split_link, &signal, &StepConfig::default()).unwrap();
    let single = propagate_link(&single_link, &signal, &StepConfig::default()).unwrap();

    let diff = compare_field_energies(single[0].final_pulse(), split[1].final_pulse());
    assert!(diff < 1e-18, "composition mismatch: {:e}", diff);
}

#[test]
fn runs_are_bit_identical_for_a_fixed_seed() {
    let time_freq = Arc::new(TimeFreq::new(1 << 10, 100e-15, FREQ_1550_NM_HZ).unwrap());
    let span = FiberSpan::new(2e3, 32, 1.5e-3, vec![-21.7e-27], 2e-4, false).unwrap();
    let link = FiberLink::new(vec![span]).unwrap();

    let run = || {
        let mut rng = StdRng::seed_from_u64(42);
        let mut params = PulseParameters::new(0.5, 5e-12, PulseType::Gaussian);
        params.noise_amplitude = 1e-3;
        let signal = InputSignal::new(time_freq.clone(), params, 1e-3, &mut rng).unwrap();
        propagate_link(&link, &signal, &StepConfig::default()).unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first[0].pulse_matrix, second[0].pulse_matrix);
    assert_eq!(first[0].spectrum_matrix, second[0].spectrum_matrix);
    assert_eq!(
        first[0].schedule.positions(),
        second[0].schedule.positions()
    );
}

#[test]
fn attenuation_halves_the_energy_over_three_db() {
    let time_freq = Arc::new(TimeFreq::new(1 << 12, 100e-15, FREQ_1550_NM_HZ).unwrap());
    let mut rng = StdRng::seed_from_u64(0);
    let params = PulseParameters::new(2.0, 1e-12, PulseType::Gaussian);
    let signal = InputSignal::new(time_freq.clone(), params, 1e-6, &mut rng).unwrap();

    // 3 dB/km over 1 km
    let span = FiberSpan::new(1e3, 100, 1e-3, vec![-20e-27], 3e-3, false).unwrap();
    let link = FiberLink::new(vec![span]).unwrap();
    let config = StepConfig {
        mode: StepMode::Variable,
        approach: StepApproach::Cautious,
        ..StepConfig::default()
    };

    let results = propagate_link(&link, &signal, &config).unwrap();
    assert!(results[0].schedule.steps() >= 2);
    let e_in = get_energy(time_freq.t(), results[0].pulse_matrix.row(0));
    let e_out = get_energy(time_freq.t(), results[0].final_pulse());
    let expected = 10.0f64.powf(-0.3);
    assert!(
        (e_out / e_in - expected).abs() < 1e-3,
        "energy ratio {} vs expected {}",
        e_out / e_in,
        expected
    );
}

#[test]
fn fundamental_soliton_keeps_its_shape() {
    let time_freq = Arc::new(TimeFreq::new(1 << 12, 50e-15, FREQ_1550_NM_HZ).unwrap());
    let duration = 1e-12;
    let beta2: f64 = -20e-27;
    let gamma = 1.3e-3;
    // N = 1: peak power |beta2| / (gamma * tau^2)
    let peak_power = beta2.abs() / (gamma * duration * duration);

    let mut rng = StdRng::seed_from_u64(0);
    let params = PulseParameters::new(peak_power.sqrt(), duration, PulseType::Sech);
    let signal = InputSignal::new(time_freq.clone(), params, 1e-7, &mut rng).unwrap();

    // One dispersion length
    let dispersion_length = duration * duration / beta2.abs();
    let span =
        FiberSpan::new(dispersion_length, 512, gamma, vec![beta2], 0.0, false).unwrap();
    let link = FiberLink::new(vec![span]).unwrap();

    let results = propagate_link(&link, &signal, &StepConfig::default()).unwrap();
    let launched: Vec<Complex64> = results[0]
        .pulse_matrix
        .row(0)
        .iter()
        .map(|a| Complex64::new(a.norm(), 0.0))
        .collect();
    let arrived: Vec<Complex64> = results[0]
        .final_pulse()
        .iter()
        .map(|a| Complex64::new(a.norm(), 0.0))
        .collect();

    let diff = compare_field_energies(&launched, &arrived);
    assert!(diff < 1e-3, "soliton deformed: {:e}", diff);
}
