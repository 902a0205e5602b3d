mod ocr;

pub use ocr::{OcrBlock, OcrLine, OcrParagraph, OcrSymbol, OcrWord, RecognizedPage};

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub text: String,
    pub bbox: BBox,
}

#[derive(Debug, Clone, Serialize)]
pub struct Word {
    pub symbols: Vec<Symbol>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub bbox: BBox,
    /// Index of this line within the flattened line sequence of the page.
    /// Presentation uses it for above/below-cursor overlay decisions.
    pub absolute_index: usize,
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paragraph {
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub paragraphs: Vec<Paragraph>,
}

/// Immutable per-page document hierarchy built once from OCR output.
///
/// There are no parent pointers; a cursor path indexes from the root, so
/// every lookup below is total and returns `None` for out-of-range paths.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    blocks: Vec<Block>,
    line_count: usize,
}

impl Document {
    /// Build the document from recognition output. Deterministic and total:
    /// empty or sparse OCR output produces an empty (or partial) document,
    /// never an error.
    pub fn build(page: RecognizedPage) -> Self {
        let mut line_count = 0;
        let blocks = page
            .blocks
            .into_iter()
            .map(|block| Block {
                paragraphs: block
                    .paragraphs
                    .into_iter()
                    .map(|paragraph| Paragraph {
                        lines: paragraph
                            .lines
                            .into_iter()
                            .map(|line| {
                                let absolute_index = line_count;
                                line_count += 1;
                                Line {
                                    bbox: line.bbox,
                                    absolute_index,
                                    words: line
                                        .words
                                        .into_iter()
                                        .map(|word| Word {
                                            symbols: word
                                                .symbols
                                                .into_iter()
                                                .map(|symbol| Symbol {
                                                    text: symbol.text,
                                                    bbox: symbol.bbox,
                                                })
                                                .collect(),
                                        })
                                        .collect(),
                                }
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self { blocks, line_count }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn block(&self, block: usize) -> Option<&Block> {
        self.blocks.get(block)
    }

    pub fn paragraph(&self, block: usize, paragraph: usize) -> Option<&Paragraph> {
        self.block(block)?.paragraphs.get(paragraph)
    }

    pub fn line(&self, block: usize, paragraph: usize, line: usize) -> Option<&Line> {
        self.paragraph(block, paragraph)?.lines.get(line)
    }

    pub fn word(&self, block: usize, paragraph: usize, line: usize, word: usize) -> Option<&Word> {
        self.line(block, paragraph, line)?.words.get(word)
    }

    pub fn symbol(
        &self,
        block: usize,
        paragraph: usize,
        line: usize,
        word: usize,
        symbol: usize,
    ) -> Option<&Symbol> {
        self.word(block, paragraph, line, word)?.symbols.get(symbol)
    }

    pub fn total_symbols(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|b| &b.paragraphs)
            .flat_map(|p| &p.lines)
            .flat_map(|l| &l.words)
            .map(|w| w.symbols.len())
            .sum()
    }
}

/// Content identity for a document, used to key persisted state. Hashing the
/// raw bytes means a renamed file keeps its saved positions.
pub fn document_fingerprint(bytes: &[u8]) -> String {
    format!("doc_{:x}", md5::compute(bytes))
}
