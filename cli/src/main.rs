//! pdfsift CLI - extract PDF text and tables as a JSON envelope

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pdfsift::render::{to_json, DEFAULT_MIN_CONTENT_CHARS, DEFAULT_PREVIEW_CHARS};
use pdfsift::{Error, ExtractionResult, Extractor, JsonFormat};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(version)]
#[command(about = "Extract PDF text and tables into a JSON result envelope", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write the envelope to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Minimum characters for content to count as real text
    #[arg(long, value_name = "N", env = "PDFSIFT_MIN_CHARS", default_value_t = DEFAULT_MIN_CONTENT_CHARS)]
    min_chars: usize,

    /// Characters kept in metadata previews
    #[arg(long, value_name = "N", env = "PDFSIFT_PREVIEW_CHARS", default_value_t = DEFAULT_PREVIEW_CHARS)]
    preview_chars: usize,

    /// Skip table detection
    #[arg(long)]
    no_tables: bool,

    /// Apply Unicode NFC normalization
    #[arg(long)]
    nfc: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    ExitCode::from(run(&cli))
}

/// Extract, print the envelope and return the process exit status.
fn run(cli: &Cli) -> u8 {
    let result = match &cli.input {
        Some(input) => build_extractor(&cli).extract(input),
        None => {
            let err = Error::Usage("pdfsift <FILE>".to_string());
            ExtractionResult::failure(err.to_string(), Some(err.diagnostic()))
        }
    };

    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = render(&result, format);

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, format!("{}\n", json)) {
                log::error!("cannot write {}: {}", path.display(), e);
                println!("{}", json);
                return 1;
            }
            log::info!("wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    result.exit_code() as u8
}

fn build_extractor(cli: &Cli) -> Extractor {
    let mut extractor = Extractor::new()
        .with_min_content_chars(cli.min_chars)
        .with_preview_chars(cli.preview_chars)
        .with_unicode_normalization(cli.nfc);
    if cli.no_tables {
        extractor = extractor.text_only();
    }
    extractor
}

/// Serialize the envelope; a serialization failure still prints valid JSON.
fn render(result: &ExtractionResult, format: JsonFormat) -> String {
    to_json(result, format).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "error": e.to_string(),
            "diagnostic": e.diagnostic(),
        })
        .to_string()
    })
}
