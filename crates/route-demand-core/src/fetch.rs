// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::feed::{Airport, FeedParser, ParsedFeed, Route};
use crate::{fnv1a_64, DemandError};
use flate2::read::GzDecoder;
use log::{debug, info};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const OPENFLIGHTS_AIRPORTS_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/airports.dat";
pub const OPENFLIGHTS_ROUTES_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/routes.dat";

pub const FEED_TIMEOUT_SECS: u64 = 30;

/// Where a raw feed comes from: a remote URL or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl FromStr for FeedSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(FeedSource::Url(s.to_string()))
        } else {
            Ok(FeedSource::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{}", url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FeedSource {
    /// Gzip-compressed payloads are recognised by a `.gz` suffix.
    pub fn is_gzipped(&self) -> bool {
        match self {
            FeedSource::Url(url) => url.split(['?', '#']).next().unwrap_or(url).ends_with(".gz"),
            FeedSource::File(path) => path.extension().is_some_and(|ext| ext == "gz"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedSources {
    pub airports: FeedSource,
    pub routes: FeedSource,
}

impl Default for FeedSources {
    fn default() -> Self {
        Self {
            airports: FeedSource::Url(OPENFLIGHTS_AIRPORTS_URL.to_string()),
            routes: FeedSource::Url(OPENFLIGHTS_ROUTES_URL.to_string()),
        }
    }
}

/// Both raw payloads, exactly as retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFeeds {
    pub airports: String,
    pub routes: String,
}

impl RawFeeds {
    /// Content key for everything derived from these payloads.
    pub fn fingerprint(&self) -> u64 {
        let mut bytes = Vec::with_capacity(self.airports.len() + self.routes.len() + 1);
        bytes.extend_from_slice(self.airports.as_bytes());
        // Separator so ("ab", "c") and ("a", "bc") differ
        bytes.push(0xff);
        bytes.extend_from_slice(self.routes.as_bytes());
        fnv1a_64(&bytes)
    }

    pub fn parse(&self) -> Result<(ParsedFeed<Airport>, ParsedFeed<Route>), DemandError> {
        let airports = FeedParser::parse_airports_str(&self.airports)?;
        let routes = FeedParser::parse_routes_str(&self.routes)?;
        Ok((airports, routes))
    }
}

pub fn build_client() -> Result<reqwest::blocking::Client, DemandError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FEED_TIMEOUT_SECS))
        .build()
        .map_err(|e| DemandError::FeedFetch {
            source_name: "client".to_string(),
            message: e.to_string(),
        })
}

/// Retrieves one payload. A single attempt; failures are not retried.
pub fn fetch_text(
    source: &FeedSource,
    source_name: &str,
    client: &reqwest::blocking::Client,
) -> Result<String, DemandError> {
    let fetch_err = |message: String| DemandError::FeedFetch {
        source_name: source_name.to_string(),
        message,
    };

    let bytes: Vec<u8> = match source {
        FeedSource::Url(url) => {
            info!("Fetching feed — name={} url={}", source_name, url);
            client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .map_err(|e| fetch_err(e.to_string()))?
                .to_vec()
        }
        FeedSource::File(path) => {
            info!(
                "Reading feed from disk — name={} path={}",
                source_name,
                path.display()
            );
            std::fs::read(path).map_err(|e| fetch_err(e.to_string()))?
        }
    };

    let text = if source.is_gzipped() {
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut text = String::new();
        decoder
            .read_to_string(&mut text)
            .map_err(|e| fetch_err(e.to_string()))?;
        debug!(
            "Decompressed feed — name={} compressed_bytes={} bytes={}",
            source_name,
            bytes.len(),
            text.len()
        );
        text
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };

    debug!("Feed retrieved — name={} bytes={}", source_name, text.len());
    Ok(text)
}

pub fn fetch_feeds(
    sources: &FeedSources,
    client: &reqwest::blocking::Client,
) -> Result<RawFeeds, DemandError> {
    let airports = fetch_text(&sources.airports, "airports", client)?;
    let routes = fetch_text(&sources.routes, "routes", client)?;
    Ok(RawFeeds { airports, routes })
}
