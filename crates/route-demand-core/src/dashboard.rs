// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::cache::{CacheStats, PipelineCache};
use crate::fetch::{build_client, fetch_feeds, FeedSources, RawFeeds};
use crate::live::{FlightGateway, LiveFetchError, LiveFlights};
use crate::network::{EnrichedRoute, RouteNetwork};
use crate::ranking::{CountryFilter, RouteFrequency, RouteRanking, TopN};
use crate::trend::{simulate, simulate_at, TrendSimulation, DEFAULT_SEED, SIMULATION_MONTHS};
use crate::DemandError;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub months: usize,
    pub seed: u64,
    /// Fixed "today" for the simulated month axis; `None` uses the clock.
    pub anchor: Option<NaiveDate>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            months: SIMULATION_MONTHS,
            seed: DEFAULT_SEED,
            anchor: None,
        }
    }
}

/// Everything shown for one selected route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDetails {
    pub route: EnrichedRoute,
    pub trend: TrendSimulation,
}

impl RouteDetails {
    pub fn origin(&self) -> &str {
        &self.route.route.source_iata
    }

    pub fn destination(&self) -> &str {
        &self.route.route.dest_iata
    }

    pub fn live_flights(
        &self,
        gateway: &dyn FlightGateway,
        limit: u32,
    ) -> Result<LiveFlights, LiveFetchError> {
        gateway.fetch_flights(self.origin(), self.destination(), limit)
    }
}

/// One user session: feed sources, settings and the memoised pipeline.
pub struct Dashboard {
    sources: FeedSources,
    settings: DashboardSettings,
    cache: PipelineCache,
}

impl Dashboard {
    pub fn new(sources: FeedSources, settings: DashboardSettings) -> Self {
        Self {
            sources,
            settings,
            cache: PipelineCache::new(),
        }
    }

    pub fn raw_feeds(&mut self) -> Result<Arc<RawFeeds>, DemandError> {
        let sources = &self.sources;
        self.cache.feeds_or_fetch(sources, || {
            let client = build_client()?;
            fetch_feeds(sources, &client)
        })
    }

    pub fn network(&mut self) -> Result<Arc<RouteNetwork>, DemandError> {
        let feeds = self.raw_feeds()?;
        self.cache.network_or_build(&feeds, |feeds| {
            let (airports, routes) = feeds.parse()?;
            info!(
                "Building route network — airports={} routes={} dropped_rows={}",
                airports.rows.len(),
                routes.rows.len(),
                airports.dropped + routes.dropped
            );
            Ok(RouteNetwork::build(&airports.rows, &routes.rows))
        })
    }

    /// Distinct source countries for the filter control, without "All".
    pub fn countries(&mut self) -> Result<Vec<String>, DemandError> {
        Ok(self.network()?.source_countries())
    }

    pub fn ranking(&mut self, filter: &CountryFilter) -> Result<Arc<RouteRanking>, DemandError> {
        self.network()?;
        // network() just populated the cache, so a ranking is always available
        Ok(self.cache.ranking(filter).unwrap_or_default())
    }

    pub fn top_routes(
        &mut self,
        top_n: TopN,
        filter: &CountryFilter,
    ) -> Result<Vec<RouteFrequency>, DemandError> {
        Ok(self.ranking(filter)?.top(top_n.get()).to_vec())
    }

    /// Route identifiers offered in the route selector.
    pub fn route_choices(&mut self, filter: &CountryFilter) -> Result<Vec<String>, DemandError> {
        Ok(self
            .ranking(filter)?
            .route_choices()
            .iter()
            .map(|r| r.route_id.clone())
            .collect())
    }

    pub fn route_details(&mut self, route_id: &str) -> Result<RouteDetails, DemandError> {
        let network = self.network()?;
        let route = network
            .first_route(route_id)
            .cloned()
            .ok_or_else(|| DemandError::UnknownRoute(route_id.to_string()))?;

        let DashboardSettings {
            months,
            seed,
            anchor,
            ..
        } = self.settings;
        let trend = match anchor {
            Some(anchor) => simulate_at(route_id, months, seed, anchor)?,
            None => simulate(route_id, months, seed)?,
        };

        Ok(RouteDetails { route, trend })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forgets every memoised stage; the next call refetches the feeds.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }
}
