// src/process/combine.rs
use arrow::{
    array::{new_null_array, ArrayRef},
    compute::{cast, concat_batches},
    datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit},
    record_batch::RecordBatch,
};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, warn};

use crate::error::Result;
use crate::schema::TRIP_SCHEMA;

/// Concatenate `frames` row-wise, in order, into one batch.
///
/// The result carries every column seen in any frame, in order of first
/// appearance; rows from a frame lacking a column get nulls there. With no
/// frames at all the canonical trips schema is returned with zero rows.
pub fn combine(frames: &[RecordBatch]) -> Result<RecordBatch> {
    if frames.is_empty() {
        debug!("no frames; returning empty trips batch");
        return Ok(RecordBatch::new_empty(TRIP_SCHEMA.clone()));
    }

    let schema = union_schema(frames);
    let aligned = frames
        .iter()
        .map(|frame| align(frame, &schema))
        .collect::<Result<Vec<_>>>()?;

    Ok(concat_batches(&schema, &aligned)?)
}

/// Outer union of the frames' fields, all nullable.
fn union_schema(frames: &[RecordBatch]) -> SchemaRef {
    let mut order: Vec<String> = Vec::new();
    let mut types: HashMap<String, DataType> = HashMap::new();

    for frame in frames {
        for field in frame.schema().fields() {
            match types.get_mut(field.name()) {
                Some(ty) => {
                    if ty != field.data_type() {
                        let widened = common_type(ty, field.data_type());
                        warn!(
                            column = %field.name(),
                            from = %ty,
                            other = %field.data_type(),
                            to = %widened,
                            "column type differs between files"
                        );
                        *ty = widened;
                    }
                }
                None => {
                    order.push(field.name().clone());
                    types.insert(field.name().clone(), field.data_type().clone());
                }
            }
        }
    }

    let fields: Vec<Field> = order
        .into_iter()
        .map(|name| {
            let ty = types.remove(&name).unwrap_or(DataType::Null);
            Field::new(name, ty, true)
        })
        .collect();
    Arc::new(Schema::new(fields))
}

/// Smallest type both `a` and `b` can be cast into without losing the
/// column entirely.
fn common_type(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        (a, b) if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (a, b) if a.is_integer() && b.is_integer() => DataType::Int64,
        (a, b) if a.is_numeric() && b.is_numeric() => DataType::Float64,
        (DataType::Timestamp(_, tz_a), DataType::Timestamp(_, tz_b)) if tz_a == tz_b => {
            DataType::Timestamp(TimeUnit::Microsecond, tz_a.clone())
        }
        _ => DataType::Utf8,
    }
}

/// Rebuild `frame` against `schema`: reorder, cast and null-fill columns.
fn align(frame: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let rows = frame.num_rows();
    let columns = schema
        .fields()
        .iter()
        .map(|field| -> Result<ArrayRef> {
            match frame.column_by_name(field.name()) {
                Some(col) if col.data_type() == field.data_type() => Ok(col.clone()),
                Some(col) => Ok(cast(col.as_ref(), field.data_type())?),
                None => Ok(new_null_array(field.data_type(), rows)),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}
