use serde::Deserialize;

use super::BBox;

/// Raw recognition output for one page, shaped like the tesseract.js
/// `data` payload. Unknown fields (confidence, baseline, choices, ...) are
/// ignored so real OCR dumps deserialize as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognizedPage {
    #[serde(default)]
    pub blocks: Vec<OcrBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrBlock {
    #[serde(default)]
    pub paragraphs: Vec<OcrParagraph>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrParagraph {
    #[serde(default)]
    pub lines: Vec<OcrLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrLine {
    #[serde(default)]
    pub bbox: BBox,
    #[serde(default)]
    pub words: Vec<OcrWord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrWord {
    #[serde(default)]
    pub symbols: Vec<OcrSymbol>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrSymbol {
    /// Single grapheme; OCR may merge ligatures into one entry.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bbox: BBox,
}
