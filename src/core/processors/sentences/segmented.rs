//! Unicode sentence boundaries (UAX #29).
//!
//! The segmenter has no cross-chunk context, so each segment is
//! re-checked: it only counts as complete when it ends in terminal
//! punctuation and not in a known abbreviation. The first segment that
//! fails the check ends the split, and everything from it onwards is
//! carried over as the remainder.

use unicode_segmentation::UnicodeSegmentation;

use super::{ends_with_abbreviation, SentenceSplit, TERMINAL_PUNCTUATION};

pub(super) fn split(text: &str) -> SentenceSplit {
    let mut sentences = Vec::new();
    let mut consumed = 0;

    for segment in text.split_sentence_bounds() {
        let candidate = segment.trim();
        let complete =
            candidate.ends_with(TERMINAL_PUNCTUATION) && !ends_with_abbreviation(candidate);
        if !complete {
            break;
        }

        sentences.push(candidate.to_string());
        consumed += segment.len();
    }

    SentenceSplit {
        sentences,
        remainder: text[consumed..].trim().to_string(),
    }
}
