// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Synthetic monthly price and booking series for a route.
//!
//! Output depends only on the route identifier, the number of months, the
//! seed and the anchor month. The route identifier moves the baseline; the
//! seed alone drives the noise, so two routes simulated with the same seed
//! share their noise offsets month by month.

use crate::DemandError;
use chrono::{Datelike, Local, Months, NaiveDate};
use flate2::Crc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const SIMULATION_MONTHS: usize = 36;
pub const DEFAULT_SEED: u64 = 42;

const PRICE_BASE: f64 = 100.0;
const PRICE_BASE_SPREAD: u32 = 50;
const PRICE_SEASON_AMPLITUDE: f64 = 15.0;
const PRICE_DRIFT_PER_MONTH: f64 = 0.5;
const PRICE_NOISE_SD: f64 = 6.0;

const BOOKING_BASE: f64 = 500.0;
const BOOKING_BASE_SPREAD: u32 = 200;
const BOOKING_SEASON_LEVEL: f64 = 300.0;
const BOOKING_SEASON_DEPTH: f64 = 0.4;
const BOOKING_NOISE_SD: f64 = 40.0;

// Separate ChaCha streams keep the two noise sequences independent.
const PRICE_STREAM: u64 = 0;
const BOOKING_STREAM: u64 = 1;

/// CRC-32 (IEEE, as used by zlib and gzip) over the UTF-8 bytes. Identical on
/// every run and platform.
pub fn stable_hash(s: &str) -> u32 {
    let mut crc = Crc::new();
    crc.update(s.as_bytes());
    crc.sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub month: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPoint {
    pub month: NaiveDate,
    pub bookings: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSimulation {
    pub route_id: String,
    pub seed: u64,
    pub prices: Vec<PricePoint>,
    pub bookings: Vec<BookingPoint>,
}

impl TrendSimulation {
    pub fn min_price(&self) -> Option<f64> {
        self.prices.iter().map(|p| p.price).reduce(f64::min)
    }

    pub fn max_price(&self) -> Option<f64> {
        self.prices.iter().map(|p| p.price).reduce(f64::max)
    }

    pub fn mean_price(&self) -> Option<f64> {
        if self.prices.is_empty() {
            return None;
        }
        Some(self.prices.iter().map(|p| p.price).sum::<f64>() / self.prices.len() as f64)
    }

    pub fn total_bookings(&self) -> u64 {
        self.bookings.iter().map(|b| u64::from(b.bookings)).sum()
    }

    /// Month with the most bookings; earliest wins a tie.
    pub fn peak_booking_month(&self) -> Option<BookingPoint> {
        self.bookings
            .iter()
            .copied()
            .reduce(|best, b| if b.bookings > best.bookings { b } else { best })
    }
}

/// `months` consecutive first-of-month dates, oldest first, the last one in
/// the anchor's month. Fails when the oldest month falls outside the calendar
/// range `NaiveDate` can represent.
pub fn month_axis(months: usize, anchor: NaiveDate) -> Result<Vec<NaiveDate>, DemandError> {
    let out_of_range = || DemandError::MonthRange { months, anchor };
    let last = anchor.with_day(1).ok_or_else(out_of_range)?;

    (0..months)
        .rev()
        .map(|back| {
            u32::try_from(back)
                .ok()
                .and_then(|back| last.checked_sub_months(Months::new(back)))
                .ok_or_else(out_of_range)
        })
        .collect()
}

fn noise(seed: u64, stream: u64, months: usize, sd: f64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    (0..months)
        .map(|_| rng.sample::<f64, _>(StandardNormal) * sd)
        .collect()
}

fn season(t: usize) -> f64 {
    (2.0 * PI * t as f64 / 12.0).sin()
}

pub fn simulate_prices_at(
    route_id: &str,
    months: usize,
    seed: u64,
    anchor: NaiveDate,
) -> Result<Vec<PricePoint>, DemandError> {
    let axis = month_axis(months, anchor)?;
    let base = PRICE_BASE + f64::from(stable_hash(route_id) % PRICE_BASE_SPREAD);
    let noise = noise(seed, PRICE_STREAM, months, PRICE_NOISE_SD);

    Ok(axis
        .into_iter()
        .zip(noise)
        .enumerate()
        .map(|(t, (month, n))| PricePoint {
            month,
            price: base
                + PRICE_SEASON_AMPLITUDE * season(t)
                + PRICE_DRIFT_PER_MONTH * t as f64
                + n,
        })
        .collect())
}

pub fn simulate_bookings_at(
    route_id: &str,
    months: usize,
    seed: u64,
    anchor: NaiveDate,
) -> Result<Vec<BookingPoint>, DemandError> {
    let axis = month_axis(months, anchor)?;
    let base = BOOKING_BASE + f64::from(stable_hash(route_id) % BOOKING_BASE_SPREAD);
    let noise = noise(seed, BOOKING_STREAM, months, BOOKING_NOISE_SD);

    Ok(axis
        .into_iter()
        .zip(noise)
        .enumerate()
        .map(|(t, (month, n))| BookingPoint {
            month,
            bookings: booking_count(
                base + BOOKING_SEASON_LEVEL * (1.0 + BOOKING_SEASON_DEPTH * season(t)) + n,
            ),
        })
        .collect())
}

/// Rounds half away from zero and floors at zero.
fn booking_count(raw: f64) -> u32 {
    raw.round().max(0.0) as u32
}

/// Both series for `route_id`, anchored at `anchor`'s month.
pub fn simulate_at(
    route_id: &str,
    months: usize,
    seed: u64,
    anchor: NaiveDate,
) -> Result<TrendSimulation, DemandError> {
    Ok(TrendSimulation {
        route_id: route_id.to_string(),
        seed,
        prices: simulate_prices_at(route_id, months, seed, anchor)?,
        bookings: simulate_bookings_at(route_id, months, seed, anchor)?,
    })
}

/// Both series for `route_id`, ending at the current month.
pub fn simulate(
    route_id: &str,
    months: usize,
    seed: u64,
) -> Result<TrendSimulation, DemandError> {
    simulate_at(route_id, months, seed, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 17).unwrap()
    }

    #[test]
    fn test_stable_hash_reference_values() {
        assert_eq!(stable_hash(""), 0);
        assert_eq!(stable_hash("a"), 0xe8b7_be43);
        assert_eq!(stable_hash("123456789"), 0xcbf4_3926);
        assert_eq!(stable_hash("SYD-MEL"), 0xd1dd_5469);
    }

    #[test]
    fn test_month_axis_calendar_steps() {
        let axis = month_axis(14, anchor()).unwrap();
        assert_eq!(axis.len(), 14);
        assert_eq!(axis[0], NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(axis[13], NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert!(axis.windows(2).all(|w| w[0] < w[1]));
        assert!(axis.iter().all(|d| d.day() == 1));
    }

    #[test]
    fn test_month_axis_zero() {
        assert!(month_axis(0, anchor()).unwrap().is_empty());
        let sim = simulate_at("SYD-MEL", 0, DEFAULT_SEED, anchor()).unwrap();
        assert!(sim.prices.is_empty());
        assert!(sim.bookings.is_empty());
        assert_eq!(sim.mean_price(), None);
    }

    #[test]
    fn test_repeatable() {
        let a = simulate_at("SYD-MEL", 36, 42, anchor()).unwrap();
        let b = simulate_at("SYD-MEL", 36, 42, anchor()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.prices.len(), 36);
        assert_eq!(a.bookings.len(), 36);
    }

    #[test]
    fn test_routes_share_noise_but_not_baseline() {
        let syd = simulate_at("SYD-MEL", 36, 42, anchor()).unwrap();
        let lhr = simulate_at("LHR-CDG", 36, 42, anchor()).unwrap();

        // SYD-MEL sits at 100 + 9, LHR-CDG at 100 + 7
        let price_base_gap = 2.0;
        for (a, b) in syd.prices.iter().zip(&lhr.prices) {
            assert!((a.price - b.price - price_base_gap).abs() < 1e-9);
        }
    }

    #[test]
    fn test_axis_outside_calendar_is_an_error() {
        let err = simulate_at("SYD-MEL", 3_200_000, 42, anchor()).unwrap_err();
        assert!(matches!(
            err,
            DemandError::MonthRange {
                months: 3_200_000,
                ..
            }
        ));
    }

    #[test]
    fn test_booking_count_floors_at_zero() {
        assert_eq!(booking_count(-250.7), 0);
        assert_eq!(booking_count(-0.4), 0);
        assert_eq!(booking_count(0.5), 1);
        assert_eq!(booking_count(812.49), 812);
        assert_eq!(booking_count(812.5), 813);
    }

    #[test]
    fn test_seed_changes_noise() {
        let a = simulate_at("SYD-MEL", 12, 1, anchor()).unwrap();
        let b = simulate_at("SYD-MEL", 12, 2, anchor()).unwrap();
        assert_ne!(a.prices, b.prices);
    }

    #[test]
    fn test_booking_stream_independent_of_price_stream() {
        let price_noise = noise(42, PRICE_STREAM, 8, 1.0);
        let booking_noise = noise(42, BOOKING_STREAM, 8, 1.0);
        assert_ne!(price_noise, booking_noise);
    }

    #[test]
    fn test_summary_helpers() {
        let sim = simulate_at("SYD-MEL", 24, 42, anchor()).unwrap();
        let min = sim.min_price().unwrap();
        let max = sim.max_price().unwrap();
        let mean = sim.mean_price().unwrap();
        assert!(min <= mean && mean <= max);
        assert!(sim.total_bookings() > 0);
        assert!(sim.peak_booking_month().is_some());
    }
}
