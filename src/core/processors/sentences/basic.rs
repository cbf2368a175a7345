//! Punctuation-based sentence boundaries.
//!
//! Numbers with internal full stops and abbreviations not followed by
//! an uppercase letter are swapped for positional placeholders before
//! boundary detection and restored afterwards.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{SentenceSplit, ABBREVIATION_PATTERN, TERMINAL_PUNCTUATION};

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

// Decimals, percentages and version numbers: 3.14, 12.5%, v1.2.3
static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"v?\d+(?:\.\d+)+%?").expect("number pattern is valid"));

static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("placeholder pattern is valid"));

struct Protected {
    text: String,
    tokens: Vec<String>,
}

impl Protected {
    fn new(text: &str) -> Self {
        let mut tokens = Vec::new();

        // Input that already uses the private-use markers is left alone
        if text.contains(PLACEHOLDER_OPEN) || text.contains(PLACEHOLDER_CLOSE) {
            return Self {
                text: text.to_string(),
                tokens,
            };
        }

        let numbers_hidden = NUMBER_PATTERN
            .replace_all(text, |caps: &Captures| placeholder(&mut tokens, &caps[0]))
            .into_owned();
        let text = protect_abbreviations(&numbers_hidden, &mut tokens);

        Self { text, tokens }
    }

    fn restore(&self, text: &str) -> String {
        if self.tokens.is_empty() {
            return text.to_string();
        }
        PLACEHOLDER_PATTERN
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.tokens.get(index))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn placeholder(tokens: &mut Vec<String>, original: &str) -> String {
    tokens.push(original.to_string());
    format!("{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", tokens.len() - 1)
}

fn protect_abbreviations(text: &str, tokens: &mut Vec<String>) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for found in ABBREVIATION_PATTERN.find_iter(text) {
        let next = text[found.end()..].trim_start().chars().next();
        if next.is_some_and(char::is_uppercase) {
            continue;
        }
        result.push_str(&text[last..found.start()]);
        result.push_str(&placeholder(tokens, found.as_str()));
        last = found.end();
    }

    result.push_str(&text[last..]);
    result
}

/// Split on runs of terminal punctuation followed by whitespace or the
/// end of the text.
pub(super) fn split(text: &str) -> SentenceSplit {
    let protected = Protected::new(text);
    let body = protected.text.as_str();

    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = body.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !TERMINAL_PUNCTUATION.contains(&c) {
            continue;
        }
        while chars
            .peek()
            .is_some_and(|(_, next)| TERMINAL_PUNCTUATION.contains(next))
        {
            chars.next();
        }

        let (end, at_boundary) = match chars.peek() {
            Some(&(pos, next)) => (pos, next.is_whitespace()),
            None => (body.len(), true),
        };
        if !at_boundary {
            continue;
        }

        let sentence = body[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(protected.restore(sentence));
        }
        start = end;
    }

    SentenceSplit {
        sentences,
        remainder: protected.restore(body[start..].trim()),
    }
}
