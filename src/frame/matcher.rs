/// Whether a typed key satisfies the expected symbol text. Exact matches
/// always pass; the substitution table tolerates typographic variants a
/// standard keyboard cannot produce, plus one known OCR misread.
pub fn matches(key: &str, expected: &str) -> bool {
    if key == expected {
        return true;
    }

    match key {
        "'" => expected == "\u{2019}",
        "\"" => matches!(expected, "\u{201C}" | "\u{201D}"),
        // em dash, en dash, minus sign
        "-" => matches!(expected, "\u{2014}" | "\u{2013}" | "\u{2212}"),
        // Tesseract regularly reads a faded 'o' as '.'; accepting the typed
        // period here is intentional and one-directional.
        "." => expected == "o",
        _ => false,
    }
}

/// Whether a typed key satisfies the separator slot after a word. A literal
/// space always does; at the end of a paragraph Enter is accepted as well.
pub fn space_slot_matches(key: &str, end_of_paragraph: bool) -> bool {
    key == " " || (end_of_paragraph && key == "Enter")
}
