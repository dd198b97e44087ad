//! Calculator and text utilities
//!
//! - [`calculator`]: keypad state machine with basic and scientific flavours
//! - [`text`]: word counts, case conversion, Base64 and URL encoding
//! - [`generate`]: passwords, lorem ipsum and QR codes

pub mod calculator;
pub mod error;
pub mod generate;
pub mod text;

pub use calculator::{AngleMode, Calculator, Flavor, Function, Key, Operator};
pub use error::CalcError;
pub use generate::{generate_lorem, generate_password, qr_data_url, qr_svg, PasswordOptions};
pub use text::{convert_case, text_stats, Case, TextStats};
