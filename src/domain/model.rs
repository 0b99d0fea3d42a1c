use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of the FDIC institution registry.
///
/// Field names follow the JSON-lines cache layout (`Cert`, `Name`, `City`,
/// `State`, `Active`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionRecord {
    #[serde(rename = "Cert")]
    pub identifier: Option<i64>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Active")]
    pub active: bool,
}

/// Result of one completed probe, stored in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub name: Option<String>,
    pub identifier: Option<i64>,
    /// `None` when the request failed before a response arrived.
    pub status_code: Option<u16>,
    pub content_length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Written(PathBuf),
    NoFilersFound,
}
