//! Utility functions for the atomic style engine

const NAME_ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encode `n` as a base-52 numeral over `a-z A-Z`, least significant symbol
/// last. Zero maps to `a`, 52 to `ba`.
pub fn number_to_name(mut n: usize) -> String {
    let base = NAME_ALPHABET.len();
    let mut symbols = Vec::new();
    loop {
        symbols.push(NAME_ALPHABET[n % base]);
        n /= base;
        if n == 0 {
            break;
        }
    }
    symbols.reverse();
    symbols.into_iter().map(char::from).collect()
}

/// Convert a camelCase property key into its CSS spelling.
///
/// Custom properties (`--foo`) and keys that are already kebab-case are
/// returned unchanged.
pub fn to_kebab_case(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }

    let mut result = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            result.push('-');
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Split a selector list on commas that are not nested inside parentheses,
/// brackets or quotes. Each part is trimmed; empty parts are dropped.
pub fn split_top_level_commas(selector: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut current = String::new();

    for ch in selector.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' | '[' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    let part = current.trim();
                    if !part.is_empty() {
                        parts.push(part.to_string());
                    }
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }

    let part = current.trim();
    if !part.is_empty() {
        parts.push(part.to_string());
    }
    parts
}
