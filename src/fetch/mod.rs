// src/fetch/mod.rs

use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::process::{decode_parquet, stamp};

pub mod http;

pub use http::HttpTripSource;

/// Where monthly trip files are read from.
pub trait TripSource {
    /// Read the object called `object`. `Ok(None)` means the object does not
    /// exist, which is an ordinary outcome for months that are not published.
    fn fetch(&self, object: &str) -> Result<Option<Bytes>>;
}

/// Remote file name for one taxi type and month, e.g.
/// `yellow_tripdata_2023-01.parquet`.
pub fn object_name(taxi_type: &str, month: NaiveDate) -> String {
    format!("{}_tripdata_{}.parquet", taxi_type, month.format("%Y-%m"))
}

/// Fetch every (taxi type, month) pair, taxi types in the outer loop and
/// months in the inner one, and return the stamped frames in that order.
///
/// Missing objects are skipped. Any other failure aborts the whole loop and
/// nothing fetched so far is returned.
#[instrument(
    level = "info",
    skip(source, taxi_types, months),
    fields(taxi_types = taxi_types.len(), months = months.len())
)]
pub fn fetch_frames<S: TripSource + ?Sized>(
    source: &S,
    taxi_types: &[String],
    months: &[NaiveDate],
    extracted_at: DateTime<Utc>,
) -> Result<Vec<RecordBatch>> {
    let mut frames = Vec::new();

    for taxi_type in taxi_types {
        for &month in months {
            let object = object_name(taxi_type, month);
            debug!(object = %object, "requesting");

            let Some(body) = source.fetch(&object)? else {
                info!(object = %object, "not found; skipping");
                continue;
            };

            let size = body.len();
            let frame = decode_parquet(&object, body)?;
            let frame = stamp(&frame, taxi_type, extracted_at)?;
            info!(object = %object, bytes = size, rows = frame.num_rows(), "fetched");
            frames.push(frame);
        }
    }

    Ok(frames)
}
