use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::{
    document::{BBox, Block, Document, Line, Paragraph, Symbol, Word},
    frame::{
        input::KeyEvent,
        matcher,
        position::{Advance, Position},
    },
    metrics::{MetricsSnapshot, TypingMetrics},
    storage::DocumentStore,
};

/// Page-scoped storage key the cursor position is persisted under.
pub const POSITION_KEY: &str = "position";

/// A keystroke that failed to match, kept for the whole document load so the
/// presentation layer can mark every missed symbol.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingError {
    /// Path of the expected symbol (separator-slot misses point at the
    /// word's final symbol).
    pub position: Position,
    pub expected: String,
    pub bbox: BBox,
    pub timestamp: DateTime<Utc>,
}

/// What the controller did with one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a qualifying event, or no active frame to evaluate against.
    Ignored,
    Correct,
    Incorrect,
    SkippedLine,
    /// The confirmed keystroke finished the document.
    Completed,
}

/// Read-only derived state for a presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub position: Position,
    pub active_bbox: Option<BBox>,
    pub completed: bool,
    pub metrics: MetricsSnapshot,
    pub errors: Vec<TypingError>,
}

/// Orchestrates one document load: evaluates key events against the active
/// target, advances the cursor, accumulates metrics and errors, and persists
/// the position per (document, page). A page or document switch constructs a
/// fresh controller; the previous load's state is discarded wholesale.
pub struct FrameController {
    document: Document,
    doc_id: String,
    page: u32,
    store: DocumentStore,
    position: Position,
    errors: Vec<TypingError>,
    metrics: TypingMetrics,
    completed: bool,
}

impl FrameController {
    /// Restores the stored position for `(doc_id, page)`, falling back to the
    /// document origin when nothing usable is stored. Storage trouble is
    /// never fatal here.
    pub fn new(document: Document, doc_id: impl Into<String>, page: u32, store: DocumentStore) -> Self {
        let doc_id = doc_id.into();

        let position = match store.get_page_value(&doc_id, page, POSITION_KEY) {
            Ok(Some(position)) => position,
            Ok(None) => Position::default(),
            Err(err) => {
                warn!("falling back to default position for {doc_id} page {page}: {err:#}");
                Position::default()
            }
        };

        if let Err(err) = store.set_current_document(&doc_id) {
            warn!("failed to record current document {doc_id}: {err:#}");
        }

        info!(
            "frame controller ready for {doc_id} page {page} at {position:?} ({} symbols)",
            document.total_symbols()
        );

        Self {
            document,
            doc_id,
            page,
            store,
            position,
            errors: Vec::new(),
            metrics: TypingMetrics::new(),
            completed: false,
        }
    }

    /// Evaluate one key event. Outcomes are recorded into the metrics log
    /// unconditionally for every evaluated keystroke; only confirmed ones
    /// move and persist the cursor.
    pub fn handle_key(&mut self, event: &KeyEvent, now: DateTime<Utc>) -> KeyOutcome {
        if self.completed || event.has_blocked_modifier() {
            return KeyOutcome::Ignored;
        }

        if event.is_line_skip() {
            self.position.next_line();
            return KeyOutcome::SkippedLine;
        }

        if !event.is_typing_key() {
            return KeyOutcome::Ignored;
        }

        // Empty document or an out-of-range cursor: no active frame, nothing
        // to evaluate against.
        let Some(symbol) = self.current_symbol() else {
            return KeyOutcome::Ignored;
        };
        let expected = symbol.text.clone();
        let expected_bbox = symbol.bbox;

        let correct = if event.is_skip_override() {
            true
        } else if self.position.is_space {
            matcher::space_slot_matches(&event.key, self.position.is_end_of_paragraph(&self.document))
        } else {
            matcher::matches(&event.key, &expected)
        };

        self.metrics.record(&event.key, event.shift_key, correct, now);

        if !correct {
            self.errors.push(TypingError {
                position: Position {
                    is_space: false,
                    ..self.position
                },
                expected,
                bbox: expected_bbox,
                timestamp: now,
            });
            return KeyOutcome::Incorrect;
        }

        match self.position.advance(&self.document, &event.key) {
            Advance::Completed => {
                self.completed = true;
                info!("document {} page {} completed", self.doc_id, self.page);
                KeyOutcome::Completed
            }
            Advance::Moved => {
                self.persist_position();
                KeyOutcome::Correct
            }
        }
    }

    fn persist_position(&self) {
        if let Err(err) =
            self.store
                .set_page_value(&self.doc_id, self.page, POSITION_KEY, &self.position)
        {
            warn!(
                "failed to persist position for {} page {}: {err:#}",
                self.doc_id, self.page
            );
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn errors(&self) -> &[TypingError] {
        &self.errors
    }

    pub fn active_bbox(&self) -> Option<BBox> {
        self.position.active_bbox(&self.document)
    }

    pub fn current_block(&self) -> Option<&Block> {
        self.document.block(self.position.block)
    }

    pub fn current_paragraph(&self) -> Option<&Paragraph> {
        self.document
            .paragraph(self.position.block, self.position.paragraph)
    }

    pub fn current_line(&self) -> Option<&Line> {
        self.document
            .line(self.position.block, self.position.paragraph, self.position.line)
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.document.word(
            self.position.block,
            self.position.paragraph,
            self.position.line,
            self.position.word,
        )
    }

    pub fn current_symbol(&self) -> Option<&Symbol> {
        self.document.symbol(
            self.position.block,
            self.position.paragraph,
            self.position.line,
            self.position.word,
            self.position.symbol,
        )
    }

    pub fn metrics_snapshot(&self, now: DateTime<Utc>) -> MetricsSnapshot {
        self.metrics.snapshot(now)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> FrameSnapshot {
        FrameSnapshot {
            position: self.position,
            active_bbox: self.active_bbox(),
            completed: self.completed,
            metrics: self.metrics.snapshot(now),
            errors: self.errors.clone(),
        }
    }
}
