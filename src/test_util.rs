//! Shared fixtures for unit tests: in-memory parquet payloads and a
//! scripted `TripSource`.

use arrow::array::Int64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{IngestError, Result};
use crate::fetch::TripSource;

/// One-column Int64 batch.
pub fn int_frame(name: &str, values: &[i64]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![Field::new(name, DataType::Int64, true)]));
    RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(values.to_vec()))]).unwrap()
}

/// Encode `batch` as a parquet file held in memory.
pub fn parquet_bytes(batch: &RecordBatch) -> Bytes {
    let mut buf = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
    }
    Bytes::from(buf)
}

#[derive(Clone)]
pub enum Reply {
    Body(Bytes),
    Status(u16),
}

/// Answers from a fixed table and records every object asked for. Objects
/// not in the table are reported missing.
#[derive(Default)]
pub struct MemoryTripSource {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<String>>,
}

impl MemoryTripSource {
    pub fn with(mut self, object: &str, reply: Reply) -> Self {
        self.replies.insert(object.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl TripSource for MemoryTripSource {
    fn fetch(&self, object: &str) -> Result<Option<Bytes>> {
        self.requests.lock().unwrap().push(object.to_string());
        match self.replies.get(object) {
            None | Some(Reply::Status(404)) => Ok(None),
            Some(Reply::Body(body)) => Ok(Some(body.clone())),
            Some(Reply::Status(code)) => Err(IngestError::Status {
                url: object.to_string(),
                status: StatusCode::from_u16(*code).unwrap(),
            }),
        }
    }
}
