// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::network::RouteNetwork;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub const ALL_COUNTRIES: &str = "All";
pub const ROUTE_CHOICE_LIMIT: usize = 200;

/// Restricts ranking to routes departing from one country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on the source country.
    Country(String),
}

impl CountryFilter {
    pub fn matches(&self, country: Option<&str>) -> bool {
        match self {
            CountryFilter::All => true,
            CountryFilter::Country(wanted) => country == Some(wanted.as_str()),
        }
    }
}

impl FromStr for CountryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_COUNTRIES {
            Ok(CountryFilter::All)
        } else {
            Ok(CountryFilter::Country(s.to_string()))
        }
    }
}

impl fmt::Display for CountryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountryFilter::All => write!(f, "{}", ALL_COUNTRIES),
            CountryFilter::Country(c) => write!(f, "{}", c),
        }
    }
}

/// Number of routes to show, kept inside [5, 200].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopN(usize);

impl TopN {
    pub const MIN: usize = 5;
    pub const MAX: usize = 200;
    pub const DEFAULT: usize = 20;

    pub fn new(n: usize) -> Self {
        Self(n.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFrequency {
    pub route_id: String,
    pub count: usize,
}

/// Route frequencies, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRanking {
    pub filter: CountryFilter,
    pub records: Vec<RouteFrequency>,
}

impl RouteRanking {
    /// The first `k` records; `k = 0` gives an empty slice.
    pub fn top(&self, k: usize) -> &[RouteFrequency] {
        &self.records[..k.min(self.records.len())]
    }

    pub fn route_choices(&self) -> &[RouteFrequency] {
        self.top(ROUTE_CHOICE_LIMIT)
    }

    /// Sum of all counts, equal to the number of rows that passed the filter.
    pub fn total(&self) -> usize {
        self.records.iter().map(|r| r.count).sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Counts rows per route identifier after applying `filter` to the source
/// country. Ties keep the order in which the identifiers were first seen.
pub fn rank_routes(network: &RouteNetwork, filter: &CountryFilter) -> RouteRanking {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut records: Vec<RouteFrequency> = Vec::new();

    for route in network
        .routes
        .iter()
        .filter(|r| filter.matches(r.source_country()))
    {
        match index.get(route.route_id.as_str()) {
            Some(&i) => records[i].count += 1,
            None => {
                index.insert(&route.route_id, records.len());
                records.push(RouteFrequency {
                    route_id: route.route_id.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    records.sort_by(|a, b| b.count.cmp(&a.count));

    RouteRanking {
        filter: filter.clone(),
        records,
    }
}
