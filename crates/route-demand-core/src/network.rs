// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::feed::{Airport, Route};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Airport metadata carried onto one end of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Endpoint {
    fn from_airport(airport: &Airport) -> Self {
        Self {
            name: airport.name.clone(),
            city: airport.city.clone(),
            country: airport.country.clone(),
            lat: airport.latitude_deg(),
            lon: airport.longitude_deg(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRoute {
    pub route: Route,
    /// `None` when no airport in the feed carries the source code.
    pub source: Option<Endpoint>,
    /// `None` when no airport in the feed carries the destination code.
    pub dest: Option<Endpoint>,
    pub route_id: String,
}

impl EnrichedRoute {
    pub fn source_country(&self) -> Option<&str> {
        self.source.as_ref().and_then(|e| e.country.as_deref())
    }

    pub fn dest_country(&self) -> Option<&str> {
        self.dest.as_ref().and_then(|e| e.country.as_deref())
    }

    pub fn source_city(&self) -> Option<&str> {
        self.source.as_ref().and_then(|e| e.city.as_deref())
    }

    pub fn dest_city(&self) -> Option<&str> {
        self.dest.as_ref().and_then(|e| e.city.as_deref())
    }
}

/// Canonical `SOURCE-DEST` key, case preserved.
pub fn route_id(source_iata: &str, dest_iata: &str) -> String {
    format!("{}-{}", source_iata, dest_iata)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteNetwork {
    pub routes: Vec<EnrichedRoute>,
}

impl RouteNetwork {
    /// Joins routes to airport metadata on both endpoints.
    ///
    /// Only airports with a usable IATA code take part in the join, and only
    /// routes whose two codes are usable survive. Every surviving route yields
    /// exactly one row; an endpoint without a matching airport stays `None`.
    /// When the airport feed repeats an IATA code, the first occurrence wins.
    pub fn build(airports: &[Airport], routes: &[Route]) -> Self {
        let mut by_iata: HashMap<&str, &Airport> = HashMap::with_capacity(airports.len());
        let mut duplicates = 0usize;

        for airport in airports.iter().filter(|a| a.has_joinable_iata()) {
            if let Some(code) = airport.iata.as_deref() {
                if by_iata.contains_key(code) {
                    duplicates += 1;
                } else {
                    by_iata.insert(code, airport);
                }
            }
        }

        if duplicates > 0 {
            warn!(
                "Airport feed repeats IATA codes; keeping first occurrence — duplicates={}",
                duplicates
            );
        }

        let lookup = |code: &str| by_iata.get(code).map(|a| Endpoint::from_airport(a));

        let enriched: Vec<EnrichedRoute> = routes
            .iter()
            .filter(|r| r.is_joinable())
            .map(|r| EnrichedRoute {
                source: lookup(&r.source_iata),
                dest: lookup(&r.dest_iata),
                route_id: route_id(&r.source_iata, &r.dest_iata),
                route: r.clone(),
            })
            .collect();

        let misses = enriched
            .iter()
            .filter(|r| r.source.is_none() || r.dest.is_none())
            .count();
        debug!(
            "Built route network — airports={} routes_in={} routes_out={} join_misses={}",
            by_iata.len(),
            routes.len(),
            enriched.len(),
            misses
        );

        Self { routes: enriched }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Distinct source countries across the whole network, sorted.
    pub fn source_countries(&self) -> Vec<String> {
        self.routes
            .iter()
            .filter_map(|r| r.source_country())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|c| c.to_string())
            .collect()
    }

    /// First row carrying `route_id`, in feed order.
    pub fn first_route(&self, route_id: &str) -> Option<&EnrichedRoute> {
        self.routes.iter().find(|r| r.route_id == route_id)
    }
}
