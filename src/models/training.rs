use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of a completed training, appended once when the
/// owning booking is marked complete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub user_id: i64,
    pub display_name: String,
    pub duration: i64,
    pub distance: f64,
    /// Completion timestamp, assigned by the server.
    pub date: DateTime<Utc>,
}
