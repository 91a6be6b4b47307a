// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::fetch::{FeedSources, RawFeeds};
use crate::network::RouteNetwork;
use crate::ranking::{rank_routes, CountryFilter, RouteRanking};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub feed_hits: u32,
    pub feed_misses: u32,
    pub network_hits: u32,
    pub network_misses: u32,
    pub ranking_hits: u32,
    pub ranking_misses: u32,
}

struct NetworkEntry {
    fingerprint: u64,
    network: Arc<RouteNetwork>,
}

/// In-memory memo of the three pipeline stages.
///
/// Raw feeds are keyed by where they came from, the network by the content
/// fingerprint of the feeds, and rankings by (network fingerprint, filter).
/// Nothing is evicted implicitly except rankings that belong to a network
/// which has since been replaced.
#[derive(Default)]
pub struct PipelineCache {
    feeds: HashMap<FeedSources, Arc<RawFeeds>>,
    network: Option<NetworkEntry>,
    rankings: HashMap<(u64, CountryFilter), Arc<RouteRanking>>,
    stats: CacheStats,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feeds_or_fetch<E>(
        &mut self,
        sources: &FeedSources,
        fetch: impl FnOnce() -> Result<RawFeeds, E>,
    ) -> Result<Arc<RawFeeds>, E> {
        if let Some(feeds) = self.feeds.get(sources) {
            self.stats.feed_hits += 1;
            debug!("Feed cache hit — airports={} routes={}", sources.airports, sources.routes);
            return Ok(Arc::clone(feeds));
        }

        self.stats.feed_misses += 1;
        let feeds = Arc::new(fetch()?);
        self.feeds.insert(sources.clone(), Arc::clone(&feeds));
        Ok(feeds)
    }

    pub fn network_or_build<E>(
        &mut self,
        feeds: &RawFeeds,
        build: impl FnOnce(&RawFeeds) -> Result<RouteNetwork, E>,
    ) -> Result<Arc<RouteNetwork>, E> {
        let fingerprint = feeds.fingerprint();

        if let Some(entry) = &self.network {
            if entry.fingerprint == fingerprint {
                self.stats.network_hits += 1;
                return Ok(Arc::clone(&entry.network));
            }
        }

        self.stats.network_misses += 1;
        let network = Arc::new(build(feeds)?);
        debug!(
            "Network cached — fingerprint={:016x} rows={}",
            fingerprint,
            network.len()
        );

        // Rankings of the previous network can never be hit again
        self.rankings.retain(|(fp, _), _| *fp == fingerprint);
        self.network = Some(NetworkEntry {
            fingerprint,
            network: Arc::clone(&network),
        });
        Ok(network)
    }

    /// Ranking for the currently cached network, or `None` if no network has
    /// been built yet.
    pub fn ranking(&mut self, filter: &CountryFilter) -> Option<Arc<RouteRanking>> {
        let entry = self.network.as_ref()?;
        let key = (entry.fingerprint, filter.clone());

        if let Some(ranking) = self.rankings.get(&key) {
            self.stats.ranking_hits += 1;
            return Some(Arc::clone(ranking));
        }

        self.stats.ranking_misses += 1;
        let ranking = Arc::new(rank_routes(&entry.network, filter));
        self.rankings.insert(key, Arc::clone(&ranking));
        Some(ranking)
    }

    pub fn network_fingerprint(&self) -> Option<u64> {
        self.network.as_ref().map(|e| e.fingerprint)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drops every stage; the next request refetches.
    pub fn invalidate(&mut self) {
        self.feeds.clear();
        self.network = None;
        self.rankings.clear();
    }

    pub fn invalidate_rankings(&mut self) {
        self.rankings.clear();
    }
}
