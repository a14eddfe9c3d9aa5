use std::sync::OnceLock;

use clap::ValueEnum;
use log::debug;
use regex::Regex;

use crate::error::{FlashError, Result};

/// Markup noise replaced by a single space before tokenizing, applied in order.
const NOISE_LITERALS: [&str; 5] = ["\t", "\n", "![[", "[[", "]]"];

/// Obsidian-style pasted attachment names. The `.` is a wildcard, so
/// `Pasted image 123_png` matches too.
const PASTED_IMAGE_PATTERN: &str = "Pasted image [0-9]+.png";

fn pasted_image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PASTED_IMAGE_PATTERN).expect("pasted image pattern is valid"))
}

/// A single unit of text shown during playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    text: String,
}

impl Flash {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered flashes for one input text. Never empty once built by [`segment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashSequence {
    flashes: Vec<Flash>,
}

impl FlashSequence {
    pub fn len(&self) -> usize {
        self.flashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashes.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Flash> {
        self.flashes.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Flash> {
        self.flashes.iter()
    }

    /// Total number of words across every flash
    pub fn word_count(&self) -> usize {
        self.flashes
            .iter()
            .map(|f| f.text.split_whitespace().count())
            .sum()
    }
}

impl<'a> IntoIterator for &'a FlashSequence {
    type Item = &'a Flash;
    type IntoIter = std::slice::Iter<'a, Flash>;

    fn into_iter(self) -> Self::IntoIter {
        self.flashes.iter()
    }
}

/// What happens to the word that finds the current group already full.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FlushMode {
    /// The word that triggers the flush is discarded (classic flashread behaviour)
    #[default]
    Drop,
    /// The word that triggers the flush opens the next group
    Carry,
}

/// Replace tabs, newlines, wiki-link brackets and pasted image names with spaces.
pub fn normalize(input: &str) -> String {
    let mut text = input.to_string();
    for noise in NOISE_LITERALS {
        text = text.replace(noise, " ");
    }
    pasted_image_re().replace_all(&text, " ").into_owned()
}

/// Tokens made only of `#` (headings) or nothing at all are never shown.
fn is_marker_only(word: &str) -> bool {
    word.chars().all(|c| c == '#')
}

/// Split `input` into groups of `words_per_flash` words.
pub fn segment(input: Option<&str>, words_per_flash: usize) -> Result<FlashSequence> {
    segment_with(input, words_per_flash, FlushMode::Drop)
}

pub fn segment_with(
    input: Option<&str>,
    words_per_flash: usize,
    mode: FlushMode,
) -> Result<FlashSequence> {
    if words_per_flash == 0 {
        return Err(FlashError::invalid_config(
            "wordcount",
            "0",
            "must be at least one word per flash",
        ));
    }

    let normalized = normalize(input.unwrap_or_default());

    let mut flashes = Vec::new();
    let mut buff = String::new();
    let mut buff_words = 0usize;

    for word in normalized.split(' ') {
        if is_marker_only(word) {
            continue;
        }

        if buff_words == words_per_flash {
            flashes.push(Flash::new(std::mem::take(&mut buff)));
            buff_words = 0;

            if mode == FlushMode::Drop {
                continue;
            }
        }

        buff.push(' ');
        buff.push_str(word);
        buff_words += 1;
    }

    flashes.push(Flash::new(buff));

    debug!(
        "segmented {} bytes into {} flashes ({} words per flash, {} mode)",
        normalized.len(),
        flashes.len(),
        words_per_flash,
        mode
    );

    Ok(FlashSequence { flashes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn texts(input: &str, n: usize) -> Vec<String> {
        segment(Some(input), n)
            .unwrap()
            .iter()
            .map(|f| f.text().to_string())
            .collect()
    }

    #[test]
    fn test_trigger_word_is_dropped() {
        assert_eq!(texts("a b c d", 2), vec![" a b", " d"]);
    }

    #[test]
    fn test_carry_mode_keeps_trigger_word() {
        let seq = segment_with(Some("a b c d"), 2, FlushMode::Carry).unwrap();
        let shown: Vec<&str> = seq.iter().map(Flash::text).collect();
        assert_eq!(shown, vec![" a b", " c d"]);
    }

    #[test]
    fn test_empty_input_yields_single_empty_flash() {
        assert_eq!(texts("", 1), vec![""]);
    }

    #[test]
    fn test_absent_input_is_treated_as_empty() {
        let seq = segment(None, 3).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(0).unwrap().text(), "");
    }

    #[test]
    fn test_heading_marker_is_skipped() {
        // "#" is skipped, "Title" fills the group, "here" triggers the flush
        assert_eq!(texts("# Title here", 1), vec![" Title", ""]);
        assert_eq!(texts("### Title here", 2), vec![" Title here"]);
    }

    #[test]
    fn test_hashtags_with_text_are_kept() {
        assert_eq!(texts("#tag word", 2), vec![" #tag word"]);
    }

    #[test]
    fn test_consecutive_spaces_do_not_count_as_words() {
        assert_eq!(texts("a    b", 2), vec![" a b"]);
    }

    #[test]
    fn test_tabs_and_newlines_split_words() {
        assert_eq!(texts("one\ttwo\nthree", 3), vec![" one two three"]);
    }

    #[test]
    fn test_wiki_links_are_unwrapped() {
        assert_eq!(texts("see [[Other Note]] now", 4), vec![" see Other Note now"]);
        assert_eq!(texts("x ![[diagram]]", 2), vec![" x diagram"]);
    }

    #[test]
    fn test_pasted_image_is_removed() {
        assert_eq!(normalize("before Pasted image 12345.png after"), "before   after");
        assert_eq!(texts("![[Pasted image 20220101.png]] text", 5), vec![" text"]);
    }

    #[test]
    fn test_pasted_image_is_case_sensitive() {
        assert_eq!(
            normalize("pasted image 1.png"),
            "pasted image 1.png".to_string()
        );
    }

    #[test]
    fn test_pasted_image_dot_matches_any_char() {
        assert_eq!(normalize("Pasted image 7xpng"), " ");
    }

    #[test]
    fn test_exact_multiple_leaves_partial_trailing_group() {
        // a b | c dropped | d e | f dropped | final empty
        assert_eq!(texts("a b c d e f", 2), vec![" a b", " d e", ""]);
    }

    #[test]
    fn test_never_empty_for_any_input() {
        for input in ["", " ", "#", "## ##", "word", "a b c d e f g h i j"] {
            for n in 1..5 {
                assert!(!segment(Some(input), n).unwrap().is_empty());
            }
        }
    }

    #[test]
    fn test_zero_words_per_flash_is_rejected() {
        assert_matches!(
            segment(Some("a b"), 0),
            Err(FlashError::InvalidConfig {
                field: "wordcount",
                ..
            })
        );
    }

    #[test]
    fn test_word_count_sums_all_flashes() {
        let seq = segment(Some("one two three four five"), 2).unwrap();
        // " one two", " four five"
        assert_eq!(seq.word_count(), 4);
    }

    #[test]
    fn test_flush_mode_display() {
        assert_eq!(FlushMode::Drop.to_string(), "drop");
        assert_eq!(FlushMode::Carry.to_string(), "carry");
    }
}
