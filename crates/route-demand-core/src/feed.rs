// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::DemandError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Literal token the OpenFlights feeds use for "no value".
pub const NULL_SENTINEL: &str = "\\N";

pub const AIRPORT_COLUMNS: usize = 14;
pub const ROUTE_COLUMNS: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub airport_id: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub altitude: Option<String>,
    pub timezone: Option<String>,
    pub dst: Option<String>,
    pub tz_database: Option<String>,
    pub airport_type: Option<String>,
    pub source: Option<String>,
}

impl Airport {
    /// True when the IATA code is present and not the null sentinel.
    pub fn has_joinable_iata(&self) -> bool {
        is_present(self.iata.as_deref())
    }

    pub fn latitude_deg(&self) -> Option<f64> {
        parse_coordinate(self.latitude.as_deref())
    }

    pub fn longitude_deg(&self) -> Option<f64> {
        parse_coordinate(self.longitude.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub airline: Option<String>,
    pub airline_id: Option<String>,
    pub source_iata: String,
    pub source_airport_id: Option<String>,
    pub dest_iata: String,
    pub dest_airport_id: Option<String>,
    pub codeshare: Option<String>,
    pub stops: Option<String>,
    pub equipment: Option<String>,
}

impl Route {
    /// True when neither endpoint code is the null sentinel.
    pub fn is_joinable(&self) -> bool {
        is_present(Some(self.source_iata.as_str())) && is_present(Some(self.dest_iata.as_str()))
    }

    pub fn is_codeshare(&self) -> bool {
        self.codeshare.as_deref() == Some("Y")
    }

    pub fn stop_count(&self) -> Option<u32> {
        self.stops.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

/// Rows accepted from a feed plus how many were discarded on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFeed<T> {
    pub rows: Vec<T>,
    pub dropped: usize,
}

pub struct FeedParser;

impl FeedParser {
    pub fn parse_airports_file<P: AsRef<Path>>(
        path: P,
    ) -> Result<ParsedFeed<Airport>, DemandError> {
        let file = File::open(path)?;
        Self::parse_airports(file)
    }

    pub fn parse_routes_file<P: AsRef<Path>>(path: P) -> Result<ParsedFeed<Route>, DemandError> {
        let file = File::open(path)?;
        Self::parse_routes(file)
    }

    /// Parses the headerless 14-column airports feed. Rows with any other column
    /// count are dropped.
    pub fn parse_airports<R: Read>(reader: R) -> Result<ParsedFeed<Airport>, DemandError> {
        let parsed = read_records(reader, AIRPORT_COLUMNS, |record| {
            Some(Airport {
                airport_id: record.get(0).unwrap_or_default().to_string(),
                name: field(record, 1),
                city: field(record, 2),
                country: field(record, 3),
                iata: field(record, 4),
                icao: field(record, 5),
                latitude: field(record, 6),
                longitude: field(record, 7),
                altitude: field(record, 8),
                timezone: field(record, 9),
                dst: field(record, 10),
                tz_database: field(record, 11),
                airport_type: field(record, 12),
                source: field(record, 13),
            })
        })?;

        debug!(
            "Parsed airports feed — rows={} dropped={}",
            parsed.rows.len(),
            parsed.dropped
        );
        Ok(parsed)
    }

    /// Parses the headerless 9-column routes feed. Rows with any other column
    /// count, or with an empty source/destination code, are dropped.
    pub fn parse_routes<R: Read>(reader: R) -> Result<ParsedFeed<Route>, DemandError> {
        let parsed = read_records(reader, ROUTE_COLUMNS, |record| {
            Some(Route {
                airline: field(record, 0),
                airline_id: field(record, 1),
                source_iata: field(record, 2)?,
                source_airport_id: field(record, 3),
                dest_iata: field(record, 4)?,
                dest_airport_id: field(record, 5),
                codeshare: field(record, 6),
                stops: field(record, 7),
                equipment: field(record, 8),
            })
        })?;

        debug!(
            "Parsed routes feed — rows={} dropped={}",
            parsed.rows.len(),
            parsed.dropped
        );
        Ok(parsed)
    }

    pub fn parse_airports_str(text: &str) -> Result<ParsedFeed<Airport>, DemandError> {
        Self::parse_airports(text.as_bytes())
    }

    pub fn parse_routes_str(text: &str) -> Result<ParsedFeed<Route>, DemandError> {
        Self::parse_routes(text.as_bytes())
    }
}

fn read_records<R, T, F>(
    reader: R,
    columns: usize,
    build: F,
) -> Result<ParsedFeed<T>, DemandError>
where
    R: Read,
    F: Fn(&csv::StringRecord) -> Option<T>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Skipping unreadable feed row: {}", e);
                dropped += 1;
                continue;
            }
        };

        if record.len() != columns {
            dropped += 1;
            continue;
        }

        match build(&record) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    Ok(ParsedFeed { rows, dropped })
}

/// Empty cells are absent; everything else is kept verbatim, sentinel included.
fn field(record: &csv::StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub(crate) fn is_present(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty() && v != NULL_SENTINEL)
}

fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    value
        .filter(|v| is_present(Some(*v)))
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
