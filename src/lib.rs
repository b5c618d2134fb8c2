//! Monthly NYC TLC trip-record ingestion.
//!
//! Expands a date window into months, fetches `{taxi_type}_tripdata_{YYYY-MM}.parquet`
//! for every configured taxi type, and combines the files into one Arrow batch
//! stamped with `taxi_type` and `extracted_at`.

pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod window;

#[cfg(test)]
mod test_util;

pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use fetch::{HttpTripSource, TripSource};
pub use pipeline::{materialize, materialize_at};
