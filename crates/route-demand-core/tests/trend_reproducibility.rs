// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use chrono::{Datelike, Local, NaiveDate};
use route_demand_core::trend::{month_axis, simulate_bookings_at, SIMULATION_MONTHS};
use route_demand_core::DemandError;
use route_demand_core::{simulate, simulate_at, stable_hash};

#[test]
fn test_same_inputs_same_series() {
    let anchor = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let a = simulate_at("SYD-MEL", 36, 42, anchor).unwrap();
    let b = simulate_at("SYD-MEL", 36, 42, anchor).unwrap();

    assert_eq!(a.prices, b.prices);
    assert_eq!(a.bookings, b.bookings);
    assert_eq!(a, b);
}

#[test]
fn test_different_routes_shift_baseline_only() {
    let anchor = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let syd = simulate_at("SYD-MEL", 36, 42, anchor).unwrap();
    let lhr = simulate_at("LHR-CDG", 36, 42, anchor).unwrap();

    assert_ne!(stable_hash("SYD-MEL") % 50, stable_hash("LHR-CDG") % 50);

    let gaps: Vec<f64> = syd
        .prices
        .iter()
        .zip(&lhr.prices)
        .map(|(a, b)| a.price - b.price)
        .collect();
    assert!(gaps.iter().all(|g| (g - gaps[0]).abs() < 1e-9));
    assert!(gaps[0].abs() > 0.5);
}

#[test]
fn test_bookings_stay_near_modelled_level() {
    let anchor = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    for seed in 0..64u64 {
        for route in ["SYD-MEL", "LHR-CDG", "", "ZZZ-AAA", "syd-mel"] {
            let bookings = simulate_bookings_at(route, 48, seed, anchor).unwrap();
            assert_eq!(bookings.len(), 48);
            // Modelled level is 680..1120 before noise
            assert!(bookings.iter().all(|b| (300..2_000).contains(&b.bookings)));
        }
    }
}

#[test]
fn test_axis_ends_at_current_month() {
    let sim = simulate("SYD-BNE", SIMULATION_MONTHS, 7).unwrap();
    let today = Local::now().date_naive();
    let last = sim.prices.last().unwrap().month;

    assert_eq!(sim.prices.len(), SIMULATION_MONTHS);
    assert_eq!(sim.bookings.len(), SIMULATION_MONTHS);
    assert_eq!(last.day(), 1);
    // Tolerate a month rollover between the two clock reads.
    assert!(last.year() * 12 + last.month() as i32 >= today.year() * 12 + today.month() as i32 - 1);
}

#[test]
fn test_axis_crosses_year_boundary() {
    let axis = month_axis(3, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()).unwrap();
    assert_eq!(
        axis,
        vec![
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        ]
    );
}

#[test]
fn test_lengths_follow_requested_months() {
    let anchor = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    for months in [0usize, 1, 12, 36, 120] {
        let sim = simulate_at("SYD-MEL", months, 42, anchor).unwrap();
        assert_eq!(sim.prices.len(), months);
        assert_eq!(sim.bookings.len(), months);
        assert!(sim
            .prices
            .iter()
            .zip(&sim.bookings)
            .all(|(p, b)| p.month == b.month));
    }
}

#[test]
fn test_unrepresentable_range_fails_instead_of_shrinking() {
    let anchor = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    match simulate_at("SYD-MEL", 3_200_000, 42, anchor) {
        Err(DemandError::MonthRange { months, .. }) => assert_eq!(months, 3_200_000),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(sim) => panic!("got {} points", sim.prices.len()),
    }
    assert!(simulate_bookings_at("SYD-MEL", 3_200_000, 42, anchor).is_err());
}
