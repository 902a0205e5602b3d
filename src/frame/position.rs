use serde::{Deserialize, Serialize};

use crate::document::{BBox, Document};

/// Cursor into the document hierarchy: five index levels plus a flag marking
/// the synthetic separator slot after the word's last symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub block: usize,
    pub paragraph: usize,
    pub line: usize,
    pub word: usize,
    pub symbol: usize,
    #[serde(default)]
    pub is_space: bool,
}

/// Result of a confirmed-keystroke advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// Advancement would cascade past the last block. The position is left
    /// unchanged; the controller records completion.
    Completed,
}

// Odometer levels, outermost first.
const BLOCK: usize = 0;
const PARAGRAPH: usize = 1;
const LINE: usize = 2;
const WORD: usize = 3;
const SYMBOL: usize = 4;

fn level_bound(doc: &Document, idx: &[usize; 5], level: usize) -> usize {
    match level {
        BLOCK => doc.blocks().len(),
        PARAGRAPH => doc.block(idx[BLOCK]).map_or(0, |b| b.paragraphs.len()),
        LINE => doc
            .paragraph(idx[BLOCK], idx[PARAGRAPH])
            .map_or(0, |p| p.lines.len()),
        WORD => doc
            .line(idx[BLOCK], idx[PARAGRAPH], idx[LINE])
            .map_or(0, |l| l.words.len()),
        _ => doc
            .word(idx[BLOCK], idx[PARAGRAPH], idx[LINE], idx[WORD])
            .map_or(0, |w| w.symbols.len()),
    }
}

/// Generic odometer step: increment at `level`, reset everything inside it,
/// and carry outward while the incremented index overflows its bound.
/// Carrying past the block level means the document is finished.
fn increment_from(doc: &Document, idx: [usize; 5], mut level: usize) -> Option<[usize; 5]> {
    let mut next = idx;
    next[level] += 1;
    for inner in level + 1..=SYMBOL {
        next[inner] = 0;
    }

    while next[level] >= level_bound(doc, &next, level) {
        if level == BLOCK {
            return None;
        }
        next[level] = 0;
        level -= 1;
        next[level] += 1;
    }

    Some(next)
}

impl Position {
    fn indices(&self) -> [usize; 5] {
        [self.block, self.paragraph, self.line, self.word, self.symbol]
    }

    fn set_indices(&mut self, idx: [usize; 5]) {
        self.block = idx[BLOCK];
        self.paragraph = idx[PARAGRAPH];
        self.line = idx[LINE];
        self.word = idx[WORD];
        self.symbol = idx[SYMBOL];
    }

    fn increment(&mut self, doc: &Document, level: usize) -> Advance {
        match increment_from(doc, self.indices(), level) {
            Some(next) => {
                self.set_indices(next);
                Advance::Moved
            }
            None => Advance::Completed,
        }
    }

    pub fn is_last_symbol_in_word(&self, doc: &Document) -> bool {
        doc.word(self.block, self.paragraph, self.line, self.word)
            .is_some_and(|w| self.symbol + 1 == w.symbols.len())
    }

    pub fn is_last_word_in_line(&self, doc: &Document) -> bool {
        doc.line(self.block, self.paragraph, self.line)
            .is_some_and(|l| self.word + 1 == l.words.len())
    }

    /// Last word of the last line of the owning paragraph. The separator slot
    /// here accepts Enter as an end-of-paragraph acknowledgment.
    pub fn is_end_of_paragraph(&self, doc: &Document) -> bool {
        self.is_last_word_in_line(doc)
            && doc
                .paragraph(self.block, self.paragraph)
                .is_some_and(|p| self.line + 1 == p.lines.len())
    }

    fn is_final_symbol(&self, doc: &Document) -> bool {
        self.is_last_symbol_in_word(doc)
            && self.is_end_of_paragraph(doc)
            && self.block + 1 == doc.blocks().len()
            && doc
                .block(self.block)
                .is_some_and(|b| self.paragraph + 1 == b.paragraphs.len())
    }

    /// Advance after a confirmed keystroke. `key` matters only for the
    /// hyphen accelerator: a confirmed hyphen on a word's last symbol is a
    /// hyphenated line wrap and continues at the start of the next line
    /// instead of demanding a separator.
    pub fn advance(&mut self, doc: &Document, key: &str) -> Advance {
        if self.is_space {
            // Separator confirmed; move on to the next word.
            self.is_space = false;
            return self.increment(doc, WORD);
        }

        if self.is_last_symbol_in_word(doc) {
            if key == "-" {
                return self.increment(doc, LINE);
            }
            if self.is_final_symbol(doc) {
                return Advance::Completed;
            }
            self.is_space = true;
            return Advance::Moved;
        }

        self.increment(doc, SYMBOL)
    }

    /// Explicit skip to the start of the next line. Deliberately neither
    /// carries nor clamps; path lookups tolerate the cursor landing out of
    /// range until the next page load.
    pub fn next_line(&mut self) {
        self.line += 1;
        self.word = 0;
        self.symbol = 0;
        self.is_space = false;
    }

    /// Geometry of the active target. The symbol slot spans the symbol's
    /// x-range and the owning line's y-range; the separator slot is that box
    /// shifted right by the symbol's own width (a heuristic for the unglyphed
    /// space after the word).
    pub fn active_bbox(&self, doc: &Document) -> Option<BBox> {
        let line = doc.line(self.block, self.paragraph, self.line)?;
        let symbol = doc.symbol(self.block, self.paragraph, self.line, self.word, self.symbol)?;

        let mut bbox = BBox {
            x0: symbol.bbox.x0,
            y0: line.bbox.y0,
            x1: symbol.bbox.x1,
            y1: line.bbox.y1,
        };
        if self.is_space {
            let width = symbol.bbox.width();
            bbox.x0 += width;
            bbox.x1 += width;
        }
        Some(bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{OcrBlock, OcrLine, OcrParagraph, OcrSymbol, OcrWord, RecognizedPage};

    fn ocr_word(text: &str, x0: f32) -> OcrWord {
        OcrWord {
            symbols: text
                .chars()
                .enumerate()
                .map(|(i, ch)| OcrSymbol {
                    text: ch.to_string(),
                    bbox: BBox {
                        x0: x0 + i as f32 * 10.0,
                        y0: 2.0,
                        x1: x0 + i as f32 * 10.0 + 8.0,
                        y1: 14.0,
                    },
                })
                .collect(),
        }
    }

    fn ocr_line(words: &[&str]) -> OcrLine {
        OcrLine {
            bbox: BBox {
                x0: 0.0,
                y0: 0.0,
                x1: 200.0,
                y1: 16.0,
            },
            words: words
                .iter()
                .enumerate()
                .map(|(i, w)| ocr_word(w, i as f32 * 80.0))
                .collect(),
        }
    }

    /// One block, one paragraph per entry, one line of words per inner slice.
    fn doc(paragraphs: &[&[&[&str]]]) -> Document {
        Document::build(RecognizedPage {
            blocks: vec![OcrBlock {
                paragraphs: paragraphs
                    .iter()
                    .map(|lines| OcrParagraph {
                        lines: lines.iter().map(|words| ocr_line(words)).collect(),
                    })
                    .collect(),
            }],
        })
    }

    fn pos(block: usize, paragraph: usize, line: usize, word: usize, symbol: usize) -> Position {
        Position {
            block,
            paragraph,
            line,
            word,
            symbol,
            is_space: false,
        }
    }

    #[test]
    fn advances_within_a_word() {
        let doc = doc(&[&[&["there"]]]);
        let mut cursor = Position::default();
        assert_eq!(cursor.advance(&doc, "t"), Advance::Moved);
        assert_eq!(cursor, pos(0, 0, 0, 0, 1));
    }

    #[test]
    fn enters_separator_slot_after_last_symbol() {
        let doc = doc(&[&[&["Hi", "there"]]]);
        let mut cursor = pos(0, 0, 0, 0, 1);
        assert_eq!(cursor.advance(&doc, "i"), Advance::Moved);
        assert!(cursor.is_space);
        assert_eq!((cursor.word, cursor.symbol), (0, 1));

        assert_eq!(cursor.advance(&doc, " "), Advance::Moved);
        assert_eq!(cursor, pos(0, 0, 0, 1, 0));
    }

    #[test]
    fn separator_slot_carries_across_lines_and_paragraphs() {
        let doc = doc(&[&[&["ab"], &["cd"]], &[&["ef"]]]);

        let mut cursor = pos(0, 0, 0, 0, 1);
        cursor.is_space = true;
        assert_eq!(cursor.advance(&doc, " "), Advance::Moved);
        assert_eq!(cursor, pos(0, 0, 1, 0, 0));

        let mut cursor = pos(0, 0, 1, 0, 1);
        cursor.is_space = true;
        assert_eq!(cursor.advance(&doc, " "), Advance::Moved);
        assert_eq!(cursor, pos(0, 1, 0, 0, 0));
    }

    #[test]
    fn partial_overflow_does_not_cascade_further() {
        let doc = doc(&[&[&["ab", "cd"], &["ef"]]]);
        let mut cursor = pos(0, 0, 0, 1, 1);
        cursor.is_space = true;
        assert_eq!(cursor.advance(&doc, " "), Advance::Moved);
        // Word overflow rolls into the line level only.
        assert_eq!(cursor, pos(0, 0, 1, 0, 0));
    }

    #[test]
    fn completion_is_a_no_op_on_indices() {
        let doc = doc(&[&[&["Hi"]]]);
        let mut cursor = pos(0, 0, 0, 0, 1);
        assert_eq!(cursor.advance(&doc, "i"), Advance::Completed);
        assert_eq!(cursor, pos(0, 0, 0, 0, 1));
    }

    #[test]
    fn no_separator_slot_after_final_word() {
        // Last word of the document never gets a separator slot; completion
        // fires straight from its final symbol.
        let doc = doc(&[&[&["Hi", "yo"]]]);
        let mut cursor = pos(0, 0, 0, 1, 1);
        assert_eq!(cursor.advance(&doc, "o"), Advance::Completed);
        assert!(!cursor.is_space);
    }

    #[test]
    fn hyphen_on_last_symbol_jumps_to_next_line() {
        let doc = doc(&[&[&["con-", "text"], &["tinued"]]]);
        let mut cursor = pos(0, 0, 0, 0, 3);
        assert_eq!(cursor.advance(&doc, "-"), Advance::Moved);
        assert_eq!(cursor, pos(0, 0, 1, 0, 0));
    }

    #[test]
    fn hyphen_jump_carries_into_next_paragraph() {
        let doc = doc(&[&[&["re-"]], &[&["do"]]]);
        let mut cursor = pos(0, 0, 0, 0, 2);
        assert_eq!(cursor.advance(&doc, "-"), Advance::Moved);
        assert_eq!(cursor, pos(0, 1, 0, 0, 0));
    }

    #[test]
    fn next_line_skip_does_not_clamp() {
        let doc = doc(&[&[&["one"]]]);
        let mut cursor = pos(0, 0, 0, 0, 2);
        cursor.next_line();
        assert_eq!(cursor, pos(0, 0, 1, 0, 0));
        // Out of range is tolerated by lookups rather than normalized.
        assert!(cursor.active_bbox(&doc).is_none());
        assert!(!cursor.is_last_symbol_in_word(&doc));
    }

    #[test]
    fn separator_bbox_is_shifted_by_symbol_width() {
        let doc = doc(&[&[&["Hi", "yo"]]]);
        let mut cursor = pos(0, 0, 0, 0, 1);
        let symbol_box = cursor.active_bbox(&doc).unwrap();
        cursor.is_space = true;
        let space_box = cursor.active_bbox(&doc).unwrap();

        let width = symbol_box.width();
        assert_eq!(space_box.x0, symbol_box.x0 + width);
        assert_eq!(space_box.x1, symbol_box.x1 + width);
        // Separator slot spans the full line height.
        assert_eq!(space_box.y0, 0.0);
        assert_eq!(space_box.y1, 16.0);
    }

    #[test]
    fn end_of_paragraph_detection() {
        let doc = doc(&[&[&["ab", "cd"], &["ef", "gh"]]]);
        assert!(!pos(0, 0, 0, 1, 1).is_end_of_paragraph(&doc));
        assert!(!pos(0, 0, 1, 0, 1).is_end_of_paragraph(&doc));
        assert!(pos(0, 0, 1, 1, 1).is_end_of_paragraph(&doc));
    }

    #[test]
    fn position_round_trips_through_json() {
        let cursor = Position {
            block: 1,
            paragraph: 2,
            line: 3,
            word: 4,
            symbol: 5,
            is_space: true,
        };
        let json = serde_json::to_string(&cursor).unwrap();
        assert!(json.contains("isSpace"));
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cursor);
    }
}
