use std::{env, fs, io::Read, path::PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::info;

use retype::{
    document::{self, Document, RecognizedPage},
    frame::{FrameController, KeyEvent, KeyOutcome},
    storage::DocumentStore,
};

const PAGE_NUMBER_KEY: &str = "page_number";

/// Replay harness: feed typed text through the engine against an OCR dump
/// and print the resulting frame snapshot. The saved position and page
/// bookmark go through the same store the interactive host would use.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(ocr_path) = args.next() else {
        bail!("usage: retype <ocr.json> [typed-text-file]");
    };

    let raw = fs::read(&ocr_path).with_context(|| format!("failed to read {ocr_path}"))?;
    let doc_id = document::document_fingerprint(&raw);
    let page: RecognizedPage = serde_json::from_slice(&raw).context("failed to parse OCR JSON")?;
    let document = Document::build(page);

    let db_path = env::var("RETYPE_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("retype.db"));
    let store = DocumentStore::new(db_path)?;

    let page_number = store
        .get_document_value::<u32>(&doc_id, PAGE_NUMBER_KEY)
        .unwrap_or(None)
        .unwrap_or(1);
    store.set_document_value(&doc_id, PAGE_NUMBER_KEY, &page_number)?;

    let mut controller = FrameController::new(document, doc_id.as_str(), page_number, store);

    let typed = match args.next() {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let mut correct = 0u32;
    let mut incorrect = 0u32;
    for ch in typed.chars() {
        let event = if ch == '\n' {
            KeyEvent::named("Enter")
        } else {
            KeyEvent::character(ch)
        };
        match controller.handle_key(&event, Utc::now()) {
            KeyOutcome::Correct => correct += 1,
            KeyOutcome::Completed => {
                correct += 1;
                break;
            }
            KeyOutcome::Incorrect => incorrect += 1,
            KeyOutcome::Ignored | KeyOutcome::SkippedLine => {}
        }
    }

    info!("replayed {correct} correct and {incorrect} incorrect keystrokes for {doc_id}");

    let snapshot = controller.snapshot(Utc::now());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
