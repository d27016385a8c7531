use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, warn};

use similarity_checker::config::Config;
use similarity_checker::input::read_query_text;
use similarity_checker::output::Report;
use similarity_checker::scoring::engine::compare_with_model;

const USAGE_ERROR: &str =
    "Invalid arguments. Expected: similarity-checker <query_file> <compare_text>";

const COMPARE_TEXT_ENCODING_ERROR: &str = "Invalid arguments: compare text is not valid UTF-8";

/// Similarity checker: composite document similarity.
///
/// Compares the contents of a query file with a literal text and prints a
/// 0-100 score as JSON, combining TF-IDF cosine, normalized edit distance
/// and sentence embedding similarity.
#[derive(Parser, Debug)]
#[command(name = "similarity-checker", version, about)]
struct Cli {
    /// Path to the UTF-8 query document
    query_file: PathBuf,

    /// Text to compare the query document against
    // Taken raw so an encoding problem is not reported as a wrong arity
    #[arg(allow_hyphen_values = true)]
    compare_text: OsString,

    /// Base directory for model files (overrides SIMILARITY_MODEL_DIR)
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr: stdout is reserved for the JSON result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("similarity_checker=warn")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return ExitCode::SUCCESS;
            }
            _ => {
                debug!("Argument parsing failed: {e}");
                return emit(&Report::error(USAGE_ERROR));
            }
        },
    };

    let compare_text = match cli.compare_text.into_string() {
        Ok(text) => text,
        Err(raw) => {
            debug!("Compare text is not UTF-8: {raw:?}");
            return emit(&Report::error(COMPARE_TEXT_ENCODING_ERROR));
        }
    };

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => return emit(&Report::from_error(&e)),
    };
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }

    let query_text = match read_query_text(&cli.query_file) {
        Ok(text) => text,
        Err(e) => return emit(&Report::from_error(&e)),
    };

    let result = compare_with_model(&config, &query_text, &compare_text).await;
    if let Err(e) = &result {
        warn!("{e:#}");
    }
    emit(&Report::from(result))
}

/// Print the report as one JSON line and map it to the process exit code.
fn emit(report: &Report) -> ExitCode {
    println!("{}", report.to_json());
    if report.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
