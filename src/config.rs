// src/config.rs

use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use std::env;
use tracing::{debug, warn};
use url::Url;

use crate::error::{IngestError, Result};

pub const START_DATE_VAR: &str = "BRUIN_START_DATE";
pub const END_DATE_VAR: &str = "BRUIN_END_DATE";
pub const VARS_VAR: &str = "BRUIN_VARS";
pub const BASE_URL_VAR: &str = "TRIPS_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://d37ci6vzurychx.cloudfront.net/trip-data";
pub const DEFAULT_TAXI_TYPE: &str = "yellow";

/// Validated settings for one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub taxi_types: Vec<String>,
    pub base_url: Url,
}

impl IngestConfig {
    /// Build a config from already-parsed values.
    ///
    /// Fails when the start month lies after the end month; a start day later
    /// than the end day inside the same month is fine, the window is monthly.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        taxi_types: Vec<String>,
        base_url: &str,
    ) -> Result<Self> {
        let (start_key, end_key) = (month_key(start_date), month_key(end_date));
        if start_key > end_key {
            return Err(IngestError::InvertedWindow {
                start: start_date,
                end: end_date,
            });
        }

        let taxi_types = if taxi_types.is_empty() {
            default_taxi_types()
        } else {
            taxi_types
        };

        Ok(Self {
            start_date,
            end_date,
            taxi_types,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Build a config from the raw string values of the environment contract.
    pub fn from_vars(
        start: Option<&str>,
        end: Option<&str>,
        vars: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<Self> {
        let start_date = parse_date(start, START_DATE_VAR)?;
        let end_date = parse_date(end, END_DATE_VAR)?;
        let taxi_types = parse_taxi_types(vars);
        Self::new(
            start_date,
            end_date,
            taxi_types,
            base_url.unwrap_or(DEFAULT_BASE_URL),
        )
    }

    /// Read `BRUIN_START_DATE`, `BRUIN_END_DATE`, `BRUIN_VARS` and the optional
    /// `TRIPS_BASE_URL` from the process environment.
    pub fn from_env() -> Result<Self> {
        let start = env::var(START_DATE_VAR).ok();
        let end = env::var(END_DATE_VAR).ok();
        let vars = env::var(VARS_VAR).ok();
        let base_url = env::var(BASE_URL_VAR).ok();
        Self::from_vars(
            start.as_deref(),
            end.as_deref(),
            vars.as_deref(),
            base_url.as_deref(),
        )
    }
}

/// Parse a required `YYYY-MM-DD` value; `var` names the setting in errors.
pub fn parse_date(value: Option<&str>, var: &'static str) -> Result<NaiveDate> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Err(IngestError::MissingDate { var }),
    };
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| IngestError::InvalidDate {
        var,
        value: value.to_string(),
        source,
    })
}

/// Read the `taxi_types` list out of the pipeline vars blob.
///
/// Accepts a JSON array or a comma-separated string. Anything absent, empty
/// or malformed yields `["yellow"]`; this never fails. Non-string entries of
/// an array are dropped and the rest kept.
pub fn parse_taxi_types(raw: Option<&str>) -> Vec<String> {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return default_taxi_types(),
    };

    let vars = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(vars = %other, "{} is not a JSON object; using default taxi types", VARS_VAR);
            return default_taxi_types();
        }
        Err(e) => {
            warn!(error = %e, "{} is not valid JSON; using default taxi types", VARS_VAR);
            return default_taxi_types();
        }
    };

    let types: Vec<String> = match vars.get("taxi_types") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let (names, dropped): (Vec<&Value>, Vec<&Value>) =
                items.iter().partition(|v| v.is_string());
            if !dropped.is_empty() {
                warn!(?dropped, "ignoring non-string taxi_types entries");
            }
            names
                .into_iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        }
        Some(Value::String(csv)) => csv
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        Some(other) => {
            warn!(taxi_types = %other, "taxi_types must be a list or a string; using default");
            Vec::new()
        }
    };

    if types.is_empty() {
        debug!("no taxi_types configured; using default");
        default_taxi_types()
    } else {
        types
    }
}

pub fn default_taxi_types() -> Vec<String> {
    vec![DEFAULT_TAXI_TYPE.to_string()]
}

fn parse_base_url(value: &str) -> Result<Url> {
    let invalid = || IngestError::InvalidBaseUrl {
        value: value.to_string(),
    };
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

fn month_key(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}
