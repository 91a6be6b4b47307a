// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod cache;
pub mod dashboard;
pub mod feed;
pub mod fetch;
pub mod live;
pub mod network;
pub mod ranking;
pub mod trend;

use thiserror::Error;

pub use dashboard::{Dashboard, DashboardSettings, RouteDetails};
pub use feed::{Airport, FeedParser, Route, NULL_SENTINEL};
pub use fetch::{FeedSource, FeedSources, RawFeeds};
pub use live::{AviationStackClient, FlightGateway, FlightRecord, LiveFetchError, LiveFlights};
pub use network::{EnrichedRoute, Endpoint, RouteNetwork};
pub use ranking::{rank_routes, CountryFilter, RouteFrequency, RouteRanking, TopN};
pub use trend::{simulate, simulate_at, stable_hash, TrendSimulation};

#[derive(Error, Debug)]
pub enum DemandError {
    /// Transport or HTTP failure while retrieving a raw feed. The message is the
    /// transport's own text.
    #[error("{message}")]
    FeedFetch { source_name: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unknown route: {0}")]
    UnknownRoute(String),
    #[error("Cannot lay out {months} months ending in {anchor}")]
    MonthRange {
        months: usize,
        anchor: chrono::NaiveDate,
    },
}

/// 64-bit FNV-1a. Used for cache fingerprints; must never change between releases.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(PRIME)
    })
}
