//! Random text and QR code generators
//!
//! Generators take the RNG as a parameter; front ends pass
//! `rand::thread_rng()` and tests pass a seeded `StdRng`.

use crate::error::CalcError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use qrcode::render::svg;
use qrcode::QrCode;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const NUMBERS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const PASSWORD_LENGTH: RangeInclusive<usize> = 4..=64;
pub const LOREM_WORD_COUNT: RangeInclusive<usize> = 10..=200;

/// Pixel size the QR code is rendered at
pub const QR_SIZE: u32 = 256;

const LOREM_WORDS: [&str; 62] = [
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in",
    "reprehenderit", "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur",
    "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui",
    "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 12,
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: false,
        }
    }
}

impl PasswordOptions {
    /// Concatenation of the selected character classes
    pub fn charset(&self) -> String {
        [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.numbers, NUMBERS),
            (self.symbols, SYMBOLS),
        ]
        .iter()
        .filter(|(selected, _)| *selected)
        .map(|(_, chars)| *chars)
        .collect()
    }
}

/// Draw `options.length` characters uniformly from the selected classes
pub fn generate_password<R: Rng + ?Sized>(
    rng: &mut R,
    options: &PasswordOptions,
) -> Result<String, CalcError> {
    if !PASSWORD_LENGTH.contains(&options.length) {
        return Err(CalcError::InvalidInput(format!(
            "Password length must be between {} and {}",
            PASSWORD_LENGTH.start(),
            PASSWORD_LENGTH.end()
        )));
    }
    let charset = options.charset().into_bytes();
    if charset.is_empty() {
        return Err(CalcError::InvalidInput(
            "Please select at least one character type".to_string(),
        ));
    }

    Ok((0..options.length)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect())
}

/// `words` random lorem-ipsum words as one capitalised sentence
pub fn generate_lorem<R: Rng + ?Sized>(rng: &mut R, words: usize) -> Result<String, CalcError> {
    if !LOREM_WORD_COUNT.contains(&words) {
        return Err(CalcError::InvalidInput(format!(
            "Word count must be between {} and {}",
            LOREM_WORD_COUNT.start(),
            LOREM_WORD_COUNT.end()
        )));
    }

    let text = (0..words)
        .map(|_| LOREM_WORDS[rng.gen_range(0..LOREM_WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ");

    let mut chars = text.chars();
    let sentence = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    Ok(sentence + ".")
}

/// Black-on-white SVG QR code for `text`
pub fn qr_svg(text: &str) -> Result<String, CalcError> {
    if text.trim().is_empty() {
        return Err(CalcError::InvalidInput(
            "Please enter text to generate QR code".to_string(),
        ));
    }
    let code = QrCode::new(text.as_bytes())
        .map_err(|e| CalcError::InvalidInput(format!("Error generating QR code: {}", e)))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(QR_SIZE, QR_SIZE)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// [`qr_svg`] as a `data:` URL, ready for an `<img src>`
pub fn qr_data_url(text: &str) -> Result<String, CalcError> {
    let svg = qr_svg(text)?;
    Ok(format!("data:image/svg+xml;base64,{}", BASE64.encode(svg)))
}
