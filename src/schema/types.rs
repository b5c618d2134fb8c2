// src/schema/types.rs

use serde::{Deserialize, Serialize};

/// A single column of the trips table contract, as declared to the
/// orchestrator.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct Column {
    pub name: String,
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub description: String,
}
