//! The default tokenizer and the `Token` alias it produces.
//!
//! A token is an opaque, non-empty string; equality is byte-equality, so
//! downstream index keys are exactly what the pipeline emits.

/// A single emitted token. Tokens are compared and hashed as plain bytes.
pub type Token = String;

/// Splits `text` into an ordered sequence of tokens.
///
/// Runs of characters that are not `char::is_alphabetic`, not
/// `char::is_numeric`, not `'`, and not `-` are treated as separators.
/// Any resulting token equal exactly to `'` or `-` is dropped (an
/// apostrophe or hyphen that wasn't adjacent to a letter/digit on either
/// side, e.g. from `" -- "` or `" ' "`).
///
/// Classification is Unicode-aware via `std::char`, so accented letters and
/// non-Latin scripts tokenize the same as ASCII. Output order matches input
/// order; position `i` in the returned vector is the i-th surviving token.
pub fn filter_text(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    let is_word_char = |c: char| c.is_alphabetic() || c.is_numeric() || c == '\'' || c == '-';

    for (idx, ch) in text.char_indices() {
        if is_word_char(ch) {
            if start.is_none() {
                start = Some(idx);
            }
        } else if let Some(token_start) = start.take() {
            push_token(&mut tokens, &text[token_start..idx]);
        }
    }
    if let Some(token_start) = start {
        push_token(&mut tokens, &text[token_start..]);
    }

    tokens
}

fn push_token(tokens: &mut Vec<Token>, raw: &str) {
    if raw == "'" || raw == "-" {
        return;
    }
    tokens.push(raw.to_string());
}
