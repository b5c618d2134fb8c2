// src/pipeline.rs

use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::IngestConfig;
use crate::error::Result;
use crate::fetch::{fetch_frames, TripSource};
use crate::process::combine;
use crate::window::month_range;

/// Run one ingestion: expand the window, fetch every taxi type and month
/// from `source`, and combine what was found into a single batch.
///
/// The extraction timestamp is taken once, before the first request.
pub fn materialize<S: TripSource + ?Sized>(config: &IngestConfig, source: &S) -> Result<RecordBatch> {
    materialize_at(config, source, Utc::now())
}

/// [`materialize`] with the extraction timestamp supplied by the caller.
pub fn materialize_at<S: TripSource + ?Sized>(
    config: &IngestConfig,
    source: &S,
    extracted_at: DateTime<Utc>,
) -> Result<RecordBatch> {
    let months = month_range(config.start_date, config.end_date);
    info!(
        start = %config.start_date,
        end = %config.end_date,
        months = months.len(),
        taxi_types = ?config.taxi_types,
        "ingesting trips"
    );

    let frames = fetch_frames(source, &config.taxi_types, &months, extracted_at)?;
    let trips = combine(&frames)?;

    info!(
        files = frames.len(),
        rows = trips.num_rows(),
        columns = trips.num_columns(),
        "materialized trips"
    );
    Ok(trips)
}
