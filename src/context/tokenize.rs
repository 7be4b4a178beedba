//! Tokenizer for context matching, handling Latin and Japanese text.

/// Minimum length of a token with no CJK characters.
const MIN_LATIN_TOKEN_LENGTH: usize = 3;

/// Splits `text` into lower-cased tokens.
///
/// Letters and digits are separated from adjacent symbols, everything other
/// than ASCII word characters, whitespace, kana and CJK ideographs is
/// dropped, and the rest is split on whitespace. Tokens with a CJK character
/// are always kept; other tokens need at least three characters and one
/// ASCII letter or digit.
pub fn tokenize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let lower = text.to_lowercase();
    let mut cleaned = String::with_capacity(lower.len());
    let mut prev: Option<char> = None;
    for c in lower.chars() {
        if let Some(p) = prev
            && is_symbol_boundary(p, c)
        {
            cleaned.push(' ');
        }
        cleaned.push(if is_word_char(c) || c.is_whitespace() || is_cjk(c) {
            c
        } else {
            ' '
        });
        prev = Some(c);
    }

    cleaned
        .split_whitespace()
        .filter(|token| keep_token(token))
        .map(str::to_owned)
        .collect()
}

/// Whether `c` is a hiragana, katakana or common CJK ideograph.
pub fn is_cjk(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A letter or digit next to anything that is neither whitespace nor a letter or digit.
fn is_symbol_boundary(prev: char, next: char) -> bool {
    let is_other = |c: char| !c.is_whitespace() && !c.is_ascii_alphanumeric();
    (prev.is_ascii_alphanumeric() && is_other(next)) || (is_other(prev) && next.is_ascii_alphanumeric())
}

fn keep_token(token: &str) -> bool {
    if token.chars().any(is_cjk) {
        return true;
    }
    token.chars().any(|c| c.is_ascii_alphanumeric())
        && token.chars().count() >= MIN_LATIN_TOKEN_LENGTH
}
