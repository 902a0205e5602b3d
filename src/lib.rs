//! Typing-practice engine over OCR'd documents.
//!
//! A page is segmented by OCR into blocks, paragraphs, lines, words and
//! symbols; the user types the displayed text character by character. The
//! engine validates each keystroke against the expected symbol, walks a
//! cursor through the hierarchy, tracks mistakes, computes live speed and
//! error figures, and persists the cursor per document fingerprint and page.
//!
//! Rendering, PDF decoding, OCR itself and key capture are the host's job;
//! it feeds [`frame::KeyEvent`]s in and reads derived state back out.

pub mod document;
pub mod frame;
pub mod metrics;
pub mod storage;

pub use document::{document_fingerprint, Document, RecognizedPage};
pub use frame::{FrameController, FrameSnapshot, KeyEvent, KeyOutcome, Position};
pub use metrics::{MetricsSnapshot, TypingMetrics};
pub use storage::DocumentStore;
