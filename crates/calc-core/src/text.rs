//! Text statistics, case conversion and encoding helpers

use crate::error::CalcError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use lazy_static::lazy_static;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};
use serde::Serialize;
use std::str::FromStr;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+").unwrap();
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n\s*\n").unwrap();
    static ref TITLE_WORD: Regex = Regex::new(r"\w\S*").unwrap();
    static ref SENTENCE_START: Regex = Regex::new(r"^\s*\w|[.!?]\s*\w").unwrap();
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"^\w|[A-Z]|\b\w").unwrap();
}

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Reading speed used for the reading-time estimate
pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub reading_time_minutes: usize,
}

pub fn text_stats(text: &str) -> TextStats {
    let characters = text.chars().count();
    let characters_no_spaces = text.chars().filter(|c| !c.is_whitespace()).count();

    if text.trim().is_empty() {
        return TextStats {
            characters,
            characters_no_spaces,
            ..TextStats::default()
        };
    }

    let words = text.split_whitespace().count();
    let sentences = SENTENCE_END
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();
    let paragraphs = PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .count();

    TextStats {
        characters,
        characters_no_spaces,
        words,
        sentences,
        paragraphs,
        reading_time_minutes: words.div_ceil(WORDS_PER_MINUTE),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    Upper,
    Lower,
    Title,
    Sentence,
    Camel,
    Snake,
    Kebab,
    Alternating,
    Reverse,
}

impl Case {
    pub const ALL: [Case; 9] = [
        Case::Upper,
        Case::Lower,
        Case::Title,
        Case::Sentence,
        Case::Camel,
        Case::Snake,
        Case::Kebab,
        Case::Alternating,
        Case::Reverse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Case::Upper => "upper",
            Case::Lower => "lower",
            Case::Title => "title",
            Case::Sentence => "sentence",
            Case::Camel => "camel",
            Case::Snake => "snake",
            Case::Kebab => "kebab",
            Case::Alternating => "alternating",
            Case::Reverse => "reverse",
        }
    }
}

impl FromStr for Case {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Case::ALL
            .into_iter()
            .find(|case| case.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::InvalidInput(format!("unknown case '{}'", s)))
    }
}

pub fn convert_case(text: &str, case: Case) -> String {
    match case {
        Case::Upper => text.to_uppercase(),
        Case::Lower => text.to_lowercase(),
        Case::Title => TITLE_WORD
            .replace_all(text, |caps: &Captures| {
                let word = &caps[0];
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                    None => String::new(),
                }
            })
            .into_owned(),
        Case::Sentence => {
            let lower = text.to_lowercase();
            SENTENCE_START
                .replace_all(&lower, |caps: &Captures| caps[0].to_uppercase())
                .into_owned()
        }
        Case::Camel => {
            // Only the match at offset 0 is lowercased
            let joined = CAMEL_BOUNDARY.replace_all(text, |caps: &Captures| {
                let m = caps.get(0).map_or("", |m| m.as_str());
                let at_start = caps.get(0).is_some_and(|m| m.start() == 0);
                if at_start {
                    m.to_lowercase()
                } else {
                    m.to_uppercase()
                }
            });
            WHITESPACE.replace_all(&joined, "").into_owned()
        }
        Case::Snake => WHITESPACE.replace_all(&text.to_lowercase(), "_").into_owned(),
        Case::Kebab => WHITESPACE.replace_all(&text.to_lowercase(), "-").into_owned(),
        Case::Alternating => text
            .chars()
            .enumerate()
            .flat_map(|(i, c)| {
                let mapped: Vec<char> = if i % 2 == 0 {
                    c.to_lowercase().collect()
                } else {
                    c.to_uppercase().collect()
                };
                mapped
            })
            .collect(),
        Case::Reverse => text.chars().rev().collect(),
    }
}

pub fn remove_spaces(text: &str) -> String {
    WHITESPACE.replace_all(text, "").into_owned()
}

/// Collapse whitespace runs to one space and trim the ends
pub fn collapse_spaces(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Break the line after every ". "
pub fn add_line_breaks(text: &str) -> String {
    text.replace(". ", ".\n")
}

pub fn remove_line_breaks(text: &str) -> String {
    text.replace('\n', " ")
}

pub fn base64_encode(text: &str) -> String {
    BASE64.encode(text.as_bytes())
}

/// Decode Base64 (ASCII whitespace ignored) into UTF-8 text
pub fn base64_decode(text: &str) -> Result<String, CalcError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|e| CalcError::InvalidInput(format!("Invalid Base64 string: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|_| CalcError::InvalidInput("Base64 data is not UTF-8 text".to_string()))
}

/// Percent-encode like `encodeURIComponent`
pub fn url_encode(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Reverse of [`url_encode`]. A `%` not followed by two hex digits, or
/// escapes that do not form UTF-8, are rejected.
pub fn url_decode(text: &str) -> Result<String, CalcError> {
    let bytes = text.as_bytes();
    for (i, _) in text.match_indices('%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(CalcError::InvalidInput(format!(
                "Invalid URL encoded string: malformed escape at {}",
                i
            )));
        }
    }

    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| CalcError::InvalidInput("Invalid URL encoded string".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stats_of_empty_text() {
        assert_eq!(text_stats(""), TextStats::default());
        let blank = text_stats("  \n ");
        assert_eq!(blank.characters, 4);
        assert_eq!(blank.words, 0);
        assert_eq!(blank.paragraphs, 0);
    }

    #[test]
    fn test_stats_counts() {
        let text = "Hello world. How are you?\n\nFine!";
        let stats = text_stats(text);
        assert_eq!(stats.characters, 32);
        assert_eq!(stats.characters_no_spaces, 26);
        assert_eq!(stats.words, 6);
        assert_eq!(stats.sentences, 3);
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.reading_time_minutes, 1);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let text = "word ".repeat(201);
        assert_eq!(text_stats(&text).reading_time_minutes, 2);
        let text = "word ".repeat(200);
        assert_eq!(text_stats(&text).reading_time_minutes, 1);
    }

    #[test]
    fn test_cases() {
        let text = "hello wORLD from rust";
        assert_eq!(convert_case(text, Case::Upper), "HELLO WORLD FROM RUST");
        assert_eq!(convert_case(text, Case::Lower), "hello world from rust");
        assert_eq!(convert_case(text, Case::Title), "Hello World From Rust");
        assert_eq!(convert_case(text, Case::Snake), "hello_world_from_rust");
        assert_eq!(convert_case(text, Case::Kebab), "hello-world-from-rust");
        assert_eq!(convert_case("abcd", Case::Alternating), "aBcD");
        assert_eq!(convert_case("abc", Case::Reverse), "cba");
    }

    #[test]
    fn test_sentence_case() {
        assert_eq!(
            convert_case("THIS IS ONE. and two! three?", Case::Sentence),
            "This is one. And two! Three?"
        );
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(convert_case("hello world", Case::Camel), "helloWorld");
        assert_eq!(convert_case("Hello big World", Case::Camel), "helloBigWorld");
    }

    #[test]
    fn test_case_from_str() {
        assert_eq!("Kebab".parse::<Case>().unwrap(), Case::Kebab);
        assert!("shouting".parse::<Case>().is_err());
    }

    #[test]
    fn test_formatting() {
        assert_eq!(remove_spaces(" a b\tc\n"), "abc");
        assert_eq!(collapse_spaces("  a   b \n c  "), "a b c");
        assert_eq!(add_line_breaks("One. Two. Three"), "One.\nTwo.\nThree");
        assert_eq!(remove_line_breaks("a\nb\nc"), "a b c");
    }

    #[test]
    fn test_base64() {
        assert_eq!(base64_encode("hello"), "aGVsbG8=");
        assert_eq!(base64_decode("aGVs bG8=").unwrap(), "hello");
        assert_eq!(base64_decode(&base64_encode("héllo ✓")).unwrap(), "héllo ✓");
        assert!(matches!(base64_decode("@@@"), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_url_encoding() {
        assert_eq!(url_encode("a b&c=d/é"), "a%20b%26c%3Dd%2F%C3%A9");
        assert_eq!(url_encode("keep-_.!~*'()"), "keep-_.!~*'()");
        assert_eq!(url_decode("a%20b%26c").unwrap(), "a b&c");
        assert_eq!(url_decode(&url_encode("100% ✓")).unwrap(), "100% ✓");
    }

    #[test]
    fn test_url_decode_rejects_malformed() {
        assert!(url_decode("%").is_err());
        assert!(url_decode("%zz").is_err());
        assert!(url_decode("abc%4").is_err());
        assert!(url_decode("%C3").is_err());
    }
}
