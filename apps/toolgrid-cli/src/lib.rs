//! toolgrid command-line front end
//!
//! Runs the same PDF, conversion, text and calculator tools as the browser
//! pages, on local files.

pub mod commands;
pub mod config;

use calc_core::{Case, PasswordOptions};
use clap::{Parser, Subcommand};
use commands::tools::{AngleArg, TextAction};
use commands::{convert, pdf, tools};
use config::Config;
use convert_core::Category;
use image_convert::{ConvertOptions, OutputFormat, Quality};
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "toolgrid")]
#[command(version, about = "PDF, image, unit and text tools")]
pub struct Cli {
    /// Config file (default: ./toolgrid.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge PDFs in the order given
    Merge {
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,
        /// Output file (default: merged.pdf in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract pages from a PDF
    Split {
        input: PathBuf,
        /// Page range, e.g. "1-3, 5" (default: every page)
        #[arg(short, long)]
        pages: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Strip metadata and compress PDF streams
    Compress {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Keep Title/Author/... metadata
        #[arg(long)]
        keep_metadata: bool,
        /// Leave streams as they are
        #[arg(long)]
        no_compress_streams: bool,
    },
    /// Show PDF metadata
    Info { input: PathBuf },
    /// Convert a value between units, e.g. `convert-unit 5 km mi`
    ConvertUnit {
        #[arg(allow_hyphen_values = true)]
        value: String,
        from: String,
        to: String,
        /// Category to look the units up in (default: inferred)
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Convert an amount between currencies
    ConvertCurrency {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        from: String,
        to: String,
    },
    /// Convert images to another format
    ConvertImage {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        format: Option<OutputFormat>,
        /// Encoder quality 0.0-1.0 (JPEG only)
        #[arg(short, long)]
        quality: Option<f32>,
    },
    /// List measurement categories and units
    Units { category: Option<Category> },
    /// Text statistics, case conversion and encodings
    Text {
        #[arg(value_enum)]
        action: TextAction,
        /// Target case for the `case` action
        #[arg(long)]
        case: Option<Case>,
        /// Input text (default: read stdin)
        text: Option<String>,
    },
    /// Generate a random password
    Password {
        #[arg(short, long, default_value_t = 12)]
        length: usize,
        #[arg(long)]
        no_uppercase: bool,
        #[arg(long)]
        no_lowercase: bool,
        #[arg(long)]
        no_numbers: bool,
        /// Include symbols such as !@#$
        #[arg(long)]
        symbols: bool,
    },
    /// Generate lorem ipsum placeholder text
    Lorem {
        #[arg(short, long, default_value_t = 50)]
        words: usize,
    },
    /// Write a QR code for the text as SVG
    Qr {
        text: String,
        /// Output file (default: qr.svg in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Press a key sequence on the calculator, e.g. `calc "12 * 3 ="`
    Calc {
        keys: String,
        #[arg(long)]
        scientific: bool,
        #[arg(long, value_enum, default_value_t = AngleArg::Deg)]
        angle: AngleArg,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(cli.config.as_deref(), &cwd)?;
    let output_dir = config.output.dir.as_path();
    let json = cli.json;

    match cli.command {
        Command::Merge { inputs, output } => {
            let output = output.unwrap_or_else(|| output_dir.join("merged.pdf"));
            emit(&pdf::merge(&inputs, &output)?, json)
        }
        Command::Split {
            input,
            pages,
            output,
        } => emit(
            &pdf::split(&input, pages.as_deref(), output.as_deref(), output_dir)?,
            json,
        ),
        Command::Compress {
            inputs,
            keep_metadata,
            no_compress_streams,
        } => {
            let mut options = config.compress;
            if keep_metadata {
                options.remove_metadata = false;
            }
            if no_compress_streams {
                options.compress_streams = false;
            }
            emit(&pdf::compress(&inputs, options, output_dir)?, json)
        }
        Command::Info { input } => emit(&pdf::info(&input)?, json),
        Command::ConvertUnit {
            value,
            from,
            to,
            category,
        } => emit(&convert::convert_unit(&value, &from, &to, category)?, json),
        Command::ConvertCurrency { amount, from, to } => {
            let rates = config.exchange_rates()?;
            emit(&convert::convert_currency(&rates, &amount, &from, &to)?, json)
        }
        Command::ConvertImage {
            inputs,
            format,
            quality,
        } => {
            let options = image_options(config.image, format, quality)?;
            let result = convert::convert_images(&inputs, options, output_dir)?;
            emit(&result, json)?;
            convert::check_images(&result)
        }
        Command::Units { category } => emit(&convert::list_units(category), json),
        Command::Text { action, case, text } => {
            let input = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            emit(&tools::text(action, case, &input)?, json)
        }
        Command::Password {
            length,
            no_uppercase,
            no_lowercase,
            no_numbers,
            symbols,
        } => {
            let options = PasswordOptions {
                length,
                uppercase: !no_uppercase,
                lowercase: !no_lowercase,
                numbers: !no_numbers,
                symbols,
            };
            emit(&tools::password(&mut rand::thread_rng(), &options)?, json)
        }
        Command::Lorem { words } => emit(&tools::lorem(&mut rand::thread_rng(), words)?, json),
        Command::Qr { text, output } => {
            let output = output.unwrap_or_else(|| output_dir.join("qr.svg"));
            emit(&tools::qr(&text, &output)?, json)
        }
        Command::Calc {
            keys,
            scientific,
            angle,
        } => emit(&tools::calc(&keys, scientific, angle)?, json),
    }
}

/// Command-line flags override the config file
fn image_options(
    defaults: ConvertOptions,
    format: Option<OutputFormat>,
    quality: Option<f32>,
) -> anyhow::Result<ConvertOptions> {
    Ok(ConvertOptions {
        format: format.unwrap_or(defaults.format),
        quality: match quality {
            Some(q) => Quality::new(q)?,
            None => defaults.quality,
        },
    })
}

fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn emit<T: Serialize + fmt::Display>(value: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}
