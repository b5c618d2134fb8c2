// src/process/mod.rs
use arrow::{
    array::{ArrayRef, StringArray, TimestampMicrosecondArray},
    compute::concat_batches,
    datatypes::{DataType, Field, FieldRef, Schema, TimeUnit},
    error::ArrowError,
    record_batch::RecordBatch,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{iter, sync::Arc};
use tracing::trace;

use crate::error::{IngestError, Result};
use crate::schema::{EXTRACTED_AT_COLUMN, EXTRACTED_AT_TIMEZONE, TAXI_TYPE_COLUMN};

pub mod combine;
pub mod write;

pub use combine::combine;
pub use write::write_parquet;

/// Decode a whole parquet payload into a single batch with the file's own
/// columns. `object` only labels errors.
pub fn decode_parquet(object: &str, body: Bytes) -> Result<RecordBatch> {
    let decode_err = |source: Box<dyn std::error::Error + Send + Sync>| IngestError::Decode {
        object: object.to_string(),
        source,
    };

    let builder = ParquetRecordBatchReaderBuilder::try_new(body).map_err(|e| decode_err(e.into()))?;
    let schema = builder.schema().clone();
    trace!(object, row_groups = builder.metadata().num_row_groups(), "decoding");

    let batches = builder
        .build()
        .map_err(|e| decode_err(e.into()))?
        .collect::<std::result::Result<Vec<_>, ArrowError>>()
        .map_err(|e| decode_err(e.into()))?;

    Ok(concat_batches(&schema, &batches)?)
}

/// Append the provenance columns to `frame`: `taxi_type` and the shared
/// `extracted_at` instant, repeated on every row.
///
/// A source column that already uses one of those names is replaced.
pub fn stamp(frame: &RecordBatch, taxi_type: &str, extracted_at: DateTime<Utc>) -> Result<RecordBatch> {
    let rows = frame.num_rows();
    let source_schema = frame.schema();

    let mut fields: Vec<FieldRef> = Vec::with_capacity(source_schema.fields().len() + 2);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.capacity());
    for (field, column) in source_schema.fields().iter().zip(frame.columns()) {
        if field.name() == TAXI_TYPE_COLUMN || field.name() == EXTRACTED_AT_COLUMN {
            continue;
        }
        fields.push(field.clone());
        columns.push(column.clone());
    }

    fields.push(Arc::new(Field::new(TAXI_TYPE_COLUMN, DataType::Utf8, false)));
    columns.push(Arc::new(StringArray::from_iter_values(
        iter::repeat(taxi_type).take(rows),
    )));

    fields.push(Arc::new(Field::new(
        EXTRACTED_AT_COLUMN,
        DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from(EXTRACTED_AT_TIMEZONE))),
        false,
    )));
    columns.push(Arc::new(
        TimestampMicrosecondArray::from_value(extracted_at.timestamp_micros(), rows)
            .with_timezone(EXTRACTED_AT_TIMEZONE),
    ));

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{int_frame, parquet_bytes};
    use arrow::array::{Array, Int64Array};
    use parquet::arrow::ArrowWriter;
    use parquet::file::properties::WriterProperties;

    #[test]
    fn test_decode_reads_every_row_group() {
        let frame = int_frame("vendorid", &(0..10).collect::<Vec<i64>>());
        let props = WriterProperties::builder()
            .set_max_row_group_size(3)
            .build();
        let mut buf = Vec::new();
        {
            let mut writer = ArrowWriter::try_new(&mut buf, frame.schema(), Some(props)).unwrap();
            writer.write(&frame).unwrap();
            writer.close().unwrap();
        }

        let decoded = decode_parquet("x.parquet", Bytes::from(buf)).unwrap();
        assert_eq!(decoded.num_rows(), 10);
        let values = decoded
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap()
            .values()
            .to_vec();
        assert_eq!(values, (0..10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_decode_empty_file() {
        let decoded = decode_parquet("x.parquet", parquet_bytes(&int_frame("vendorid", &[]))).unwrap();
        assert_eq!(decoded.num_rows(), 0);
        assert_eq!(decoded.schema().field(0).name(), "vendorid");
    }

    #[test]
    fn test_stamp_appends_provenance() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:30:00.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        let stamped = stamp(&int_frame("vendorid", &[1, 2]), "green", at).unwrap();

        let names: Vec<_> = stamped.schema().fields().iter().map(|f| f.name().clone()).collect();
        assert_eq!(names, vec!["vendorid", "taxi_type", "extracted_at"]);

        let taxi = stamped.column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(taxi.iter().flatten().collect::<Vec<_>>(), vec!["green", "green"]);

        let ts = stamped
            .column(2)
            .as_any()
            .downcast_ref::<TimestampMicrosecondArray>()
            .unwrap();
        assert_eq!(ts.values().to_vec(), vec![at.timestamp_micros(); 2]);
        assert_eq!(ts.timezone(), Some("UTC"));
    }

    #[test]
    fn test_stamp_replaces_existing_taxi_type() {
        let frame = int_frame("taxi_type", &[7]);
        let stamped = stamp(&frame, "yellow", Utc::now()).unwrap();
        assert_eq!(stamped.num_columns(), 2);
        let taxi = stamped
            .column_by_name("taxi_type")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(taxi.value(0), "yellow");
    }
}
