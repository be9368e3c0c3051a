//! Canonicalization of recognized strings.

use ocr::BoundingBox;
use unicode_normalization::UnicodeNormalization;

/// Accented letters (and `ñ`) that survive cleaning next to plain ASCII.
const SPANISH_LETTERS: [char; 14] = [
    'Á', 'É', 'Í', 'Ó', 'Ú', 'á', 'é', 'í', 'ó', 'ú', 'Ñ', 'ñ', 'Ü', 'ü',
];

/// Whether a cleaned string reads as a price or as part of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Numeric,
    Textual,
}

/// A detection after cleaning, ready for merging.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedToken {
    pub text: String,
    pub bbox: BoundingBox,
    pub kind: TokenKind,
}

impl CleanedToken {
    pub fn new(raw: &str, bbox: BoundingBox) -> Self {
        let text = clean(raw);
        let kind = classify(&text);
        Self { text, bbox, kind }
    }
}

/// Normalize OCR output to letters, digits and whitespace.
///
/// The recognizer regularly reads `ú` as `ü`, so that one is swapped back.
/// `.` and `,` are kept only between two digits, which preserves prices like
/// `3,50` while dropping punctuation around words. A number with more than one
/// separator (`1.234,50`) loses all of them so it still reads as a price. The
/// result is trimmed and `clean(clean(s)) == clean(s)`.
pub fn clean(text: &str) -> String {
    let kept: Vec<char> = text
        .nfc()
        .map(|c| if c == 'ü' { 'ú' } else { c })
        .filter(|&c| is_allowed(c) || is_decimal_separator(c))
        .collect();

    let inner: Vec<char> = kept
        .iter()
        .enumerate()
        .filter(|&(i, &c)| !is_decimal_separator(c) || between_digits(&kept, i))
        .map(|(_, &c)| c)
        .collect();

    let cleaned: String = drop_grouping_separators(&inner).into_iter().collect();
    cleaned.trim().to_string()
}

/// `true` for a plain or decimal number: digits, then optionally one `.` or
/// `,` followed by more digits. The whole string has to match.
pub fn is_numeric(text: &str) -> bool {
    let int_len = text.bytes().take_while(u8::is_ascii_digit).count();
    if int_len == 0 {
        return false;
    }

    let rest = &text[int_len..];
    let fraction = rest.strip_prefix(is_decimal_separator).unwrap_or(rest);
    fraction.bytes().all(|b| b.is_ascii_digit())
}

pub fn classify(text: &str) -> TokenKind {
    if is_numeric(text) {
        TokenKind::Numeric
    } else {
        TokenKind::Textual
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || SPANISH_LETTERS.contains(&c)
}

fn is_decimal_separator(c: char) -> bool {
    c == '.' || c == ','
}

fn between_digits(chars: &[char], i: usize) -> bool {
    let before = i.checked_sub(1).and_then(|j| chars.get(j));
    let after = chars.get(i + 1);
    matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit())
}

/// Strip the separators of every digit run that has more than one.
fn drop_grouping_separators(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut start = 0;

    while start < chars.len() {
        let run_len = chars[start..]
            .iter()
            .take_while(|c| c.is_ascii_digit() || is_decimal_separator(**c))
            .count();
        if run_len == 0 {
            out.push(chars[start]);
            start += 1;
            continue;
        }

        let run = &chars[start..start + run_len];
        let separators = run.iter().filter(|c| is_decimal_separator(**c)).count();
        out.extend(
            run.iter()
                .copied()
                .filter(|&c| separators <= 1 || !is_decimal_separator(c)),
        );
        start += run_len;
    }

    out
}
