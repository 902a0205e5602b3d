mod types;

pub use types::{KeystrokeEvent, MetricsSnapshot};

use chrono::{DateTime, Duration, Utc};

/// Keystrokes older than this are dropped from the log.
const RETENTION_SECS: i64 = 60;
/// Sub-window the speed estimate is computed over.
const SPEED_WINDOW_SECS: i64 = 10;
/// Floor for the elapsed-time divisor: one second, in minutes.
const MIN_TIME_SPAN_MINUTES: f64 = 1.0 / 60.0;

/// Rolling time-windowed log of keystroke outcomes. Trimming is lazy (by
/// age, on each record), so a fresh document simply starts with an empty log
/// and old sessions age out on their own; there is no reset call.
#[derive(Debug, Default)]
pub struct TypingMetrics {
    history: Vec<KeystrokeEvent>,
}

impl TypingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evaluated keystroke, dropping entries that have aged out
    /// of the retention window.
    pub fn record(&mut self, key: &str, shift_key: bool, was_correct: bool, now: DateTime<Utc>) {
        let cutoff = now - Duration::seconds(RETENTION_SECS);
        self.history.retain(|event| event.timestamp >= cutoff);
        self.history.push(KeystrokeEvent {
            key: key.to_string(),
            shift_key,
            was_correct,
            timestamp: now,
        });
    }

    /// Live figures, recomputed from the raw log on every call. Speed counts
    /// space/Enter strokes in the last 10 seconds as word boundaries and
    /// divides by the elapsed time back to the oldest stroke in that window.
    pub fn snapshot(&self, now: DateTime<Utc>) -> MetricsSnapshot {
        let retention_cutoff = now - Duration::seconds(RETENTION_SECS);
        let error_count = self
            .history
            .iter()
            .filter(|event| event.timestamp >= retention_cutoff && !event.was_correct)
            .count();

        let window_cutoff = now - Duration::seconds(SPEED_WINDOW_SECS);
        let mut total_words = 0usize;
        let mut oldest: Option<DateTime<Utc>> = None;
        for event in self.history.iter().filter(|e| e.timestamp >= window_cutoff) {
            if oldest.is_none() {
                // History is append-ordered, so the first hit is the oldest.
                oldest = Some(event.timestamp);
            }
            if is_word_boundary(&event.key) {
                total_words += 1;
            }
        }

        let time_span_minutes = match oldest {
            Some(first) => {
                let span_ms = (now - first).num_milliseconds().max(0);
                (span_ms as f64 / 60_000.0).max(MIN_TIME_SPAN_MINUTES)
            }
            None => MIN_TIME_SPAN_MINUTES,
        };

        MetricsSnapshot {
            speed: (total_words as f64 / time_span_minutes).floor() as u64,
            error_count,
        }
    }
}

fn is_word_boundary(key: &str) -> bool {
    key == " " || key == "Enter"
}
