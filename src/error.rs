// src/error.rs

use arrow::error::ArrowError;
use chrono::NaiveDate;
use thiserror::Error;

/// Everything that can abort an ingestion run.
///
/// A missing month (HTTP 404) is not an error and never shows up here.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{var} is required")]
    MissingDate { var: &'static str },

    #[error("{var}={value:?} is not a YYYY-MM-DD date")]
    InvalidDate {
        var: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("window starts in {start} but ends in the earlier month of {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },

    #[error("base location {value:?} is not an absolute http(s) URL")]
    InvalidBaseUrl { value: String },

    #[error("GET {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{object} is not a readable parquet file")]
    Decode {
        object: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

impl IngestError {
    /// True for the errors raised while validating configuration, i.e. before
    /// any request was made.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            IngestError::MissingDate { .. }
                | IngestError::InvalidDate { .. }
                | IngestError::InvertedWindow { .. }
                | IngestError::InvalidBaseUrl { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
