// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema, SchemaRef, TimeUnit};
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::types::Column;

pub const TAXI_TYPE_COLUMN: &str = "taxi_type";
pub const EXTRACTED_AT_COLUMN: &str = "extracted_at";
pub const EXTRACTED_AT_TIMEZONE: &str = "UTC";

/// name, declared type, timezone, description
static TRIP_COLUMNS: &[(&str, &str, Option<&str>, &str)] = &[
    (
        TAXI_TYPE_COLUMN,
        "string",
        None,
        "Taxi service type (e.g., yellow, green).",
    ),
    (
        "vendorid",
        "integer",
        None,
        "TLC vendor code from the raw trip data.",
    ),
    (
        "tpep_pickup_datetime",
        "timestamp",
        None,
        "Pickup timestamp for yellow taxi trips (raw column).",
    ),
    (
        "lpep_pickup_datetime",
        "timestamp",
        None,
        "Pickup timestamp for green taxi trips (raw column).",
    ),
    (
        "passenger_count",
        "integer",
        None,
        "Number of passengers reported by the driver.",
    ),
    (
        "trip_distance",
        "float",
        None,
        "Trip distance in miles from the meter.",
    ),
    (
        "payment_type",
        "integer",
        None,
        "Numeric payment type code from TLC schema.",
    ),
    (
        "total_amount",
        "float",
        None,
        "Total amount charged for the trip (USD).",
    ),
    (
        EXTRACTED_AT_COLUMN,
        "timestamp",
        Some(EXTRACTED_AT_TIMEZONE),
        "UTC timestamp when the record was ingested.",
    ),
];

/// The declared column contract of the trips table, in output order.
pub fn trip_columns() -> Vec<Column> {
    TRIP_COLUMNS
        .iter()
        .map(|&(name, ty, tz, description)| Column {
            name: name.to_string(),
            ty: ty.to_string(),
            timezone: tz.map(String::from),
            description: description.to_string(),
        })
        .collect()
}

/// Canonical schema handed downstream when a window produced no rows.
pub static TRIP_SCHEMA: Lazy<SchemaRef> = Lazy::new(|| build_arrow_schema(&trip_columns()));

/// Map a declared column type into an Arrow DataType.
///
/// - string    → Utf8
/// - integer   → Int64
/// - float     → Float64
/// - timestamp → Timestamp(µs, timezone)
/// - boolean   → Boolean
/// - fallback  → Utf8
pub fn map_to_arrow_type(ty: &str, timezone: &Option<String>) -> DataType {
    match ty.to_ascii_lowercase().as_str() {
        "string" => DataType::Utf8,
        "integer" => DataType::Int64,
        "float" => DataType::Float64,
        "timestamp" => DataType::Timestamp(
            TimeUnit::Microsecond,
            timezone.as_deref().map(Arc::from),
        ),
        "boolean" => DataType::Boolean,
        _ => DataType::Utf8,
    }
}

/// Build an ArrowSchema (inside an Arc) from a slice of `Column`s.
pub fn build_arrow_schema(cols: &[Column]) -> SchemaRef {
    let fields: Vec<ArrowField> = cols
        .iter()
        .map(|col| {
            let dt = map_to_arrow_type(&col.ty, &col.timezone);
            ArrowField::new(&col.name, dt, /* nullable = */ true)
        })
        .collect();

    Arc::new(ArrowSchema::new(fields))
}
