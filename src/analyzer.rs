//! Text analysis for note content
//!
//! Produces the character and word counts recorded on edit events. Word
//! counting handles mixed Chinese/English text: each CJK ideograph counts
//! as one word, and runs of Latin word characters (letters, digits,
//! underscore, apostrophe) count as one word when they contain at least
//! one non-apostrophe character.

use serde::Serialize;

/// Character and word counts for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub char_count: i64,
    pub word_count: i64,
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn is_latin_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

/// Count characters and words in `text`.
///
/// Characters are Unicode scalar values, including whitespace and
/// newlines.
pub fn analyze_text(text: &str) -> TextStats {
    let mut char_count: i64 = 0;
    let mut word_count: i64 = 0;

    let mut in_run = false;
    let mut run_has_word_char = false;

    for c in text.chars() {
        char_count += 1;

        if is_cjk(c) {
            word_count += 1;
        }

        if is_latin_word_char(c) {
            in_run = true;
            if c != '\'' {
                run_has_word_char = true;
            }
        } else if in_run {
            if run_has_word_char {
                word_count += 1;
            }
            in_run = false;
            run_has_word_char = false;
        }
    }
    if in_run && run_has_word_char {
        word_count += 1;
    }

    TextStats {
        char_count,
        word_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_words() {
        let stats = analyze_text("hello world, don't stop");
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.char_count, 23);
    }

    #[test]
    fn test_chinese_counts_per_character() {
        let stats = analyze_text("你好世界");
        assert_eq!(stats.char_count, 4);
        assert_eq!(stats.word_count, 4);
    }

    #[test]
    fn test_mixed_text() {
        // Two ideographs plus two Latin words.
        let stats = analyze_text("abc中文def");
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.char_count, 8);
    }

    #[test]
    fn test_bare_apostrophes_are_not_words() {
        assert_eq!(analyze_text("'' '").word_count, 0);
        assert_eq!(analyze_text("'a'").word_count, 1);
    }

    #[test]
    fn test_empty_text() {
        let stats = analyze_text("");
        assert_eq!(stats.char_count, 0);
        assert_eq!(stats.word_count, 0);
    }
}
