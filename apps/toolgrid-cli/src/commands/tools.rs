//! Text utilities, generators and the calculator

use calc_core::text::{
    add_line_breaks, base64_decode, base64_encode, collapse_spaces, remove_line_breaks,
    remove_spaces, url_decode, url_encode,
};
use super::write_output;
use calc_core::{
    convert_case, generate_lorem, generate_password, qr_svg, text_stats, AngleMode, Calculator,
    Case, Flavor, PasswordOptions, TextStats,
};
use clap::ValueEnum;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextAction {
    Stats,
    Case,
    RemoveSpaces,
    CollapseSpaces,
    AddLineBreaks,
    RemoveLineBreaks,
    Base64Encode,
    Base64Decode,
    UrlEncode,
    UrlDecode,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TextResult {
    Stats(TextStats),
    Text { text: String },
}

impl fmt::Display for TextResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextResult::Stats(stats) => {
                writeln!(f, "Characters:              {}", stats.characters)?;
                writeln!(f, "Characters (no spaces):  {}", stats.characters_no_spaces)?;
                writeln!(f, "Words:                   {}", stats.words)?;
                writeln!(f, "Sentences:               {}", stats.sentences)?;
                writeln!(f, "Paragraphs:              {}", stats.paragraphs)?;
                write!(f, "Reading time:            {} min", stats.reading_time_minutes)
            }
            TextResult::Text { text } => f.write_str(text),
        }
    }
}

/// `case` is only read by [`TextAction::Case`]
pub fn text(action: TextAction, case: Option<Case>, input: &str) -> anyhow::Result<TextResult> {
    let text = match action {
        TextAction::Stats => return Ok(TextResult::Stats(text_stats(input))),
        TextAction::Case => {
            let case = case.ok_or_else(|| anyhow::anyhow!("--case is required for the case action"))?;
            convert_case(input, case)
        }
        TextAction::RemoveSpaces => remove_spaces(input),
        TextAction::CollapseSpaces => collapse_spaces(input),
        TextAction::AddLineBreaks => add_line_breaks(input),
        TextAction::RemoveLineBreaks => remove_line_breaks(input),
        TextAction::Base64Encode => base64_encode(input),
        TextAction::Base64Decode => base64_decode(input)?,
        TextAction::UrlEncode => url_encode(input),
        TextAction::UrlDecode => url_decode(input)?,
    };
    Ok(TextResult::Text { text })
}

/// Generated text (password or lorem ipsum)
#[derive(Debug, Serialize)]
pub struct Generated {
    pub text: String,
}

impl fmt::Display for Generated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub fn password<R: Rng + ?Sized>(
    rng: &mut R,
    options: &PasswordOptions,
) -> anyhow::Result<Generated> {
    Ok(Generated {
        text: generate_password(rng, options)?,
    })
}

pub fn lorem<R: Rng + ?Sized>(rng: &mut R, words: usize) -> anyhow::Result<Generated> {
    Ok(Generated {
        text: generate_lorem(rng, words)?,
    })
}

#[derive(Debug, Serialize)]
pub struct QrResult {
    pub output: PathBuf,
    pub size: usize,
}

impl fmt::Display for QrResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QR code written to {} ({} bytes)", self.output.display(), self.size)
    }
}

/// Render `text` as an SVG QR code at `output`
pub fn qr(text: &str, output: &Path) -> anyhow::Result<QrResult> {
    let svg = qr_svg(text)?;
    write_output(output, svg.as_bytes())?;
    Ok(QrResult {
        output: output.to_path_buf(),
        size: svg.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AngleArg {
    #[default]
    Deg,
    Rad,
    Grad,
}

impl From<AngleArg> for AngleMode {
    fn from(arg: AngleArg) -> Self {
        match arg {
            AngleArg::Deg => AngleMode::Deg,
            AngleArg::Rad => AngleMode::Rad,
            AngleArg::Grad => AngleMode::Grad,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalcResult {
    pub display: String,
    pub pending: Option<String>,
    pub memory: f64,
    pub history: Vec<String>,
}

impl fmt::Display for CalcResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Press `keys` (e.g. `"12 × 3 ="`) on a fresh calculator
pub fn calc(keys: &str, scientific: bool, angle: AngleArg) -> anyhow::Result<CalcResult> {
    let flavor = if scientific {
        Flavor::Scientific
    } else {
        Flavor::Basic
    };
    let mut calculator = Calculator::new(flavor);
    calculator.set_angle_mode(angle.into());
    calculator.press_sequence(keys)?;

    Ok(CalcResult {
        display: calculator.display().to_string(),
        pending: calculator.pending_expression(),
        memory: calculator.memory(),
        history: calculator.history().map(str::to_string).collect(),
    })
}
