//! Script segmentation.
//!
//! Turns a free-form script into short, ordered chunks of text. Each chunk
//! becomes one section of the project.
//!
//! Three cascading passes, each applied only to pieces still over the limit:
//! 1. Split on runs of sentence/line delimiters (`.`, `!`, `?`, `;`, newline)
//! 2. Split over-long pieces on commas
//! 3. Greedy word-wrap of whatever is still too long
//!
//! The limit is soft: a single word longer than the limit is emitted whole.

use crate::sections::Section;

/// Default soft maximum section length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 30;

/// Minimum trimmed script length accepted for a new project.
pub const MIN_SCRIPT_CHARS: usize = 50;

/// Segmentation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentConfig {
    /// Soft maximum section length, enforced at word boundaries.
    pub max_chars: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl SegmentConfig {
    /// Creates a config with the given soft maximum (0 is treated as 1).
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    fn limit(&self) -> usize {
        self.max_chars.max(1)
    }
}

#[inline]
fn is_sentence_delimiter(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?' | ';' | '\n')
}

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Segments a script with the default 30-character limit.
///
/// An empty result means the script had no usable text; callers must treat
/// that as a recoverable condition rather than create an empty project.
pub fn segment(script: &str) -> Vec<String> {
    segment_with(script, &SegmentConfig::default())
}

/// Segments a script with an explicit configuration.
pub fn segment_with(script: &str, config: &SegmentConfig) -> Vec<String> {
    let limit = config.limit();
    let mut sections = Vec::new();

    for piece in script
        .split(is_sentence_delimiter)
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        if char_len(piece) <= limit {
            sections.push(piece.to_string());
            continue;
        }

        for part in piece.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if char_len(part) <= limit {
                sections.push(part.to_string());
            } else {
                wrap_words(part, limit, &mut sections);
            }
        }
    }

    sections
}

/// Greedily packs whitespace-delimited words into chunks of at most `limit`
/// characters. Words are never split.
fn wrap_words(part: &str, limit: usize, out: &mut Vec<String>) {
    let mut buffer = String::new();
    let mut buffer_len = 0;

    for word in part.split_whitespace() {
        let word_len = char_len(word);
        if buffer.is_empty() {
            buffer.push_str(word);
            buffer_len = word_len;
        } else if buffer_len + 1 + word_len > limit {
            out.push(std::mem::take(&mut buffer));
            buffer.push_str(word);
            buffer_len = word_len;
        } else {
            buffer.push(' ');
            buffer.push_str(word);
            buffer_len += 1 + word_len;
        }
    }

    if !buffer.is_empty() {
        out.push(buffer);
    }
}

/// Segments a script and wraps each chunk in a [`Section`] with positional
/// id (`"1"`, `"2"`, ...) and title (`"Section 1"`, ...).
pub fn sections_from_script(script: &str) -> Vec<Section> {
    sections_from_script_with(script, &SegmentConfig::default())
}

/// Like [`sections_from_script`], with an explicit configuration.
pub fn sections_from_script_with(script: &str, config: &SegmentConfig) -> Vec<Section> {
    segment_with(script, config)
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let position = index + 1;
            Section::new(position.to_string(), text).with_title(format!("Section {}", position))
        })
        .collect()
}

// =============================================================================
// SCRIPT STATISTICS
// =============================================================================

/// Word and character counts for a script, as shown while it is being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStats {
    /// Whitespace-delimited words.
    pub word_count: usize,
    /// Characters in the raw script.
    pub char_count: usize,
    /// Characters after trimming surrounding whitespace.
    pub trimmed_char_count: usize,
}

impl ScriptStats {
    /// Computes statistics for a script.
    pub fn of(script: &str) -> Self {
        Self {
            word_count: script.split_whitespace().count(),
            char_count: char_len(script),
            trimmed_char_count: char_len(script.trim()),
        }
    }

    /// True when the script is long enough to start a project.
    pub fn is_valid(&self) -> bool {
        self.trimmed_char_count >= MIN_SCRIPT_CHARS
    }

    /// How many more characters are needed before the script is valid.
    pub fn missing_chars(&self) -> usize {
        MIN_SCRIPT_CHARS.saturating_sub(self.trimmed_char_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bounded(sections: &[String], limit: usize) {
        for s in sections {
            assert!(!s.is_empty());
            assert!(
                s.chars().count() <= limit || !s.contains(char::is_whitespace),
                "section over limit and not a single word: {:?}",
                s
            );
        }
    }

    #[test]
    fn test_sentences_are_split_and_trimmed() {
        let sections = segment("Hello world. This is a test!");
        assert_eq!(sections, vec!["Hello world", "This is a test"]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(segment("").is_empty());
        assert!(segment("   ").is_empty());
        assert!(segment("\n\n\t  \n").is_empty());
    }

    #[test]
    fn test_delimiter_only_input() {
        assert!(segment("...!!!???;;;").is_empty());
        assert!(segment(". ! ? ;\n .").is_empty());
    }

    #[test]
    fn test_delimiter_runs_and_newlines() {
        let sections = segment("Wait!!! What?!\nReally...\r\nYes;no");
        assert_eq!(sections, vec!["Wait", "What", "Really", "Yes", "no"]);
    }

    #[test]
    fn test_short_piece_keeps_commas() {
        let sections = segment("Red, green, blue.");
        assert_eq!(sections, vec!["Red, green, blue"]);
    }

    #[test]
    fn test_long_piece_splits_on_commas() {
        let sections = segment("First we open the app, then we look at the dashboard.");
        assert_eq!(sections, vec!["First we open the app", "then we look at the dashboard"]);
    }

    #[test]
    fn test_long_part_is_word_wrapped() {
        let script = "The clean interface makes it easy to navigate between different tasks";
        let sections = segment(script);
        assert_eq!(
            sections,
            vec![
                "The clean interface makes it",
                "easy to navigate between",
                "different tasks",
            ]
        );
        assert_bounded(&sections, DEFAULT_MAX_CHARS);
        assert_eq!(sections.join(" "), script);
    }

    #[test]
    fn test_long_single_word_is_not_split() {
        let word = "Pneumonoultramicroscopicsilicovolcanoconiosis";
        let sections = segment(&format!("a {} b", word));
        assert_eq!(sections, vec!["a", word, "b"]);
    }

    #[test]
    fn test_exact_limit_is_kept() {
        let piece = "a".repeat(DEFAULT_MAX_CHARS);
        assert_eq!(segment(&piece), vec![piece.clone()]);
    }

    #[test]
    fn test_length_is_counted_in_chars() {
        // 20 chars, 60 bytes
        let piece = "한국어".repeat(6) + "한국";
        assert!(piece.len() > DEFAULT_MAX_CHARS);
        assert_eq!(segment(&piece), vec![piece]);
    }

    #[test]
    fn test_custom_limit() {
        let config = SegmentConfig::new(10);
        let sections = segment_with("one two three four five", &config);
        assert_eq!(sections, vec!["one two", "three four", "five"]);
        assert_bounded(&sections, 10);
    }

    #[test]
    fn test_zero_limit_is_treated_as_one() {
        let config = SegmentConfig { max_chars: 0 };
        assert_eq!(segment_with("a b", &config), vec!["a", "b"]);
    }

    #[test]
    fn test_bounded_on_long_script() {
        let script = "Welcome to our product demo! Today I'll show you how our revolutionary \
            new app can transform your daily workflow.\n\nFirst, let's look at the main \
            dashboard where you can see all your projects at a glance; the clean interface \
            makes it easy, simple, and honestly rather pleasant to navigate between tasks.";
        let sections = segment(script);
        assert!(sections.len() > 5);
        assert_bounded(&sections, DEFAULT_MAX_CHARS);
    }

    #[test]
    fn test_sections_from_script() {
        let sections = sections_from_script("Hello world. This is a test!");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, "1");
        assert_eq!(sections[0].title, "Section 1");
        assert_eq!(sections[0].text, "Hello world");
        assert_eq!(sections[1].id, "2");
        assert_eq!(sections[1].title, "Section 2");
        assert!(sections[1].image.is_none());
        assert!(sections[1].voice_settings.is_none());
    }

    #[test]
    fn test_script_stats() {
        let stats = ScriptStats::of("  two words  ");
        assert_eq!(stats.word_count, 2);
        assert_eq!(stats.char_count, 13);
        assert_eq!(stats.trimmed_char_count, 9);
        assert!(!stats.is_valid());
        assert_eq!(stats.missing_chars(), MIN_SCRIPT_CHARS - 9);

        let long = "x".repeat(MIN_SCRIPT_CHARS);
        let stats = ScriptStats::of(&long);
        assert!(stats.is_valid());
        assert_eq!(stats.missing_chars(), 0);
    }
}
