pub mod arrow;
pub mod types;
pub mod write;

pub use arrow::{
    build_arrow_schema, map_to_arrow_type, trip_columns, EXTRACTED_AT_COLUMN,
    EXTRACTED_AT_TIMEZONE, TAXI_TYPE_COLUMN, TRIP_SCHEMA,
};
pub use types::Column;
pub use write::write_columns;
