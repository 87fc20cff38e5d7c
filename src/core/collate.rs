//! Spanish-aware text ordering for product names.
//!
//! Comparison runs in three passes: base letters ignoring case and accents, then
//! accents, then case (lowercase first). `ñ` is its own letter between `n` and `o`.

use std::cmp::Ordering;

/// Compares two display strings the way a Spanish-locale user expects.
#[must_use]
pub fn compare_text(a: &str, b: &str) -> Ordering {
    primary(a)
        .cmp(primary(b))
        .then_with(|| lowered(a).cmp(lowered(b)))
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}

fn lowered(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

fn primary(s: &str) -> impl Iterator<Item = (char, u8)> + '_ {
    lowered(s).map(base_letter)
}

fn base_letter(c: char) -> (char, u8) {
    let base = match c {
        'ñ' => return ('n', 1),
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    };
    (base, 0)
}
