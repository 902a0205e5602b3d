use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One evaluated keystroke, correct or not. Skip-line commands are not
/// keystroke evaluations and never land here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystrokeEvent {
    pub key: String,
    pub shift_key: bool,
    pub was_correct: bool,
    pub timestamp: DateTime<Utc>,
}

/// The two externally visible typing figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Words-per-minute estimate over the speed window, floored.
    pub speed: u64,
    /// Incorrect keystrokes across the full retention window.
    pub error_count: usize,
}
