// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const AVIATIONSTACK_URL: &str = "http://api.aviationstack.com/v1/flights";
pub const ACCESS_KEY_VAR: &str = "AVIATIONSTACK_KEY";
pub const LIVE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FLIGHT_LIMIT: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiveFetchError {
    #[error("AVIATIONSTACK_KEY missing. Add it to .env or the environment.")]
    MissingCredentials,
    #[error("{0}")]
    Timeout(String),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
    /// The provider answered with an in-band error object.
    #[error("{0}")]
    Api(String),
    #[error("{0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for LiveFetchError {
    /// The request URL carries the access key, so it never reaches the message.
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        let message = e.to_string();
        if e.is_timeout() {
            LiveFetchError::Timeout(message)
        } else if let Some(status) = e.status() {
            LiveFetchError::Http {
                status: status.as_u16(),
                message,
            }
        } else if e.is_decode() {
            LiveFetchError::MalformedResponse(message)
        } else {
            LiveFetchError::Transport(message)
        }
    }
}

/// Display order of the flight columns.
pub const FLIGHT_COLUMNS: [&str; 8] = [
    "airline.name",
    "flight.number",
    "flight.iata",
    "departure.iata",
    "arrival.iata",
    "departure.scheduled",
    "arrival.scheduled",
    "flight_status",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub airline_name: Option<String>,
    pub flight_number: Option<String>,
    pub flight_iata: Option<String>,
    pub departure_iata: Option<String>,
    pub arrival_iata: Option<String>,
    pub departure_scheduled: Option<String>,
    pub arrival_scheduled: Option<String>,
    pub flight_status: Option<String>,
}

impl FlightRecord {
    /// Picks the known fields out of one provider record. Anything missing,
    /// null or of an unexpected shape is left as `None`.
    pub fn from_json(value: &Value) -> Self {
        let pick = |pointer: &str| value.pointer(pointer).and_then(scalar_to_string);
        Self {
            airline_name: pick("/airline/name"),
            flight_number: pick("/flight/number"),
            flight_iata: pick("/flight/iata"),
            departure_iata: pick("/departure/iata"),
            arrival_iata: pick("/arrival/iata"),
            departure_scheduled: pick("/departure/scheduled"),
            arrival_scheduled: pick("/arrival/scheduled"),
            flight_status: pick("/flight_status"),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            "airline.name" => &self.airline_name,
            "flight.number" => &self.flight_number,
            "flight.iata" => &self.flight_iata,
            "departure.iata" => &self.departure_iata,
            "arrival.iata" => &self.arrival_iata,
            "departure.scheduled" => &self.departure_scheduled,
            "arrival.scheduled" => &self.arrival_scheduled,
            "flight_status" => &self.flight_status,
            _ => return None,
        };
        value.as_deref()
    }

    /// Columns that carry a value in at least one record, in display order.
    pub fn present_columns(records: &[FlightRecord]) -> Vec<&'static str> {
        FLIGHT_COLUMNS
            .into_iter()
            .filter(|name| records.iter().any(|r| r.get(name).is_some()))
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A successful lookup. Failure is the `Err` side, never an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiveFlights {
    Found(Vec<FlightRecord>),
    Empty,
}

impl LiveFlights {
    pub fn from_records(records: Vec<FlightRecord>) -> Self {
        if records.is_empty() {
            LiveFlights::Empty
        } else {
            LiveFlights::Found(records)
        }
    }

    pub fn records(&self) -> &[FlightRecord] {
        match self {
            LiveFlights::Found(records) => records,
            LiveFlights::Empty => &[],
        }
    }
}

/// Parses a provider response body.
pub fn parse_flights_response(body: &str) -> Result<LiveFlights, LiveFetchError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| LiveFetchError::MalformedResponse(e.to_string()))?;

    if !value.is_object() {
        return Err(LiveFetchError::MalformedResponse(
            "expected a JSON object".to_string(),
        ));
    }

    if let Some(err) = value.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(LiveFetchError::Api(message));
    }

    let records = value
        .get("data")
        .and_then(Value::as_array)
        .map(|data| data.iter().map(FlightRecord::from_json).collect())
        .unwrap_or_default();

    Ok(LiveFlights::from_records(records))
}

pub trait FlightGateway {
    fn fetch_flights(
        &self,
        origin: &str,
        destination: &str,
        limit: u32,
    ) -> Result<LiveFlights, LiveFetchError>;
}

pub struct AviationStackClient {
    access_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl AviationStackClient {
    pub fn new(access_key: Option<String>) -> Self {
        Self {
            access_key: access_key.filter(|k| !k.trim().is_empty()),
            base_url: AVIATIONSTACK_URL.to_string(),
            timeout: Duration::from_secs(LIVE_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.access_key.is_some()
    }
}

impl FlightGateway for AviationStackClient {
    fn fetch_flights(
        &self,
        origin: &str,
        destination: &str,
        limit: u32,
    ) -> Result<LiveFlights, LiveFetchError> {
        let key = self
            .access_key
            .as_deref()
            .ok_or(LiveFetchError::MissingCredentials)?;

        let limit_str = limit.to_string();
        let url = reqwest::Url::parse_with_params(
            &self.base_url,
            &[
                ("access_key", key),
                ("dep_iata", origin),
                ("arr_iata", destination),
                ("limit", limit_str.as_str()),
            ],
        )
        .map_err(|e| LiveFetchError::Transport(e.to_string()))?;

        info!(
            "Fetching live flights — origin={} destination={} limit={}",
            origin, destination, limit
        );

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let body = client.get(url).send()?.error_for_status()?.text()?;

        let flights = parse_flights_response(&body)?;
        debug!("Live flights received — count={}", flights.records().len());
        Ok(flights)
    }
}
