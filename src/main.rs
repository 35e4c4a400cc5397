use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use jparse::config::HarnessOptions;
use jparse::diagnostics::{render_errors, SourceError};
use jparse::parser::ParseOptions;
use jparse::FrontendError;

const EXIT_OK: i32 = 0;
const EXIT_FAILED: i32 = 1;
const EXIT_SETUP: i32 = 2;

#[derive(Parser)]
#[command(name = "jparse", version, about = "Java parser and golden-file harness")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every .java file under a directory and compare against goldens
    Parse {
        /// Corpus directory
        dir: PathBuf,
        /// Rewrite goldens with the current normalized output
        #[arg(long)]
        record: bool,
        /// Worker threads (defaults to available parallelism)
        #[arg(long)]
        jobs: Option<usize>,
        /// Per-file parse budget in milliseconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Report every syntax error in a file, not just the first
        #[arg(long)]
        recover: bool,
        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Parse one file, print diagnostics or its normalized form
    Check {
        /// Source file path
        file: PathBuf,
        /// Report every syntax error, not just the first
        #[arg(long)]
        recover: bool,
    },
    /// Print the declaration outline of one file
    Outline {
        /// Source file path
        file: PathBuf,
        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "jparse=debug" } else { "jparse=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Commands::Parse { dir, record, jobs, timeout, recover, format } => {
            run_corpus(&dir, record, jobs, timeout, recover, format)
        }
        Commands::Check { file, recover } => check_file(&file, recover),
        Commands::Outline { file, format } => outline_file(&file, format),
    };
    std::process::exit(code);
}

fn run_corpus(
    dir: &Path,
    record: bool,
    jobs: Option<usize>,
    timeout: Option<u64>,
    recover: bool,
    format: Format,
) -> i32 {
    let mut options = match HarnessOptions::load(dir) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            return EXIT_SETUP;
        }
    };
    // Flags win over jparse.toml.
    options.record = record;
    options.recover |= recover;
    if jobs.is_some() {
        options.jobs = jobs;
    }
    if timeout.is_some() {
        options.timeout_ms = timeout;
    }
    debug!(?options, "harness options");

    let report = match jparse::harness::run(dir, &options) {
        Ok(report) => report,
        Err(err) => {
            error!(%err, "harness setup failed");
            eprintln!("error: {err}");
            return EXIT_SETUP;
        }
    };
    match format {
        Format::Text => print!("{report}"),
        Format::Json => println!("{}", report.to_json()),
    }
    if report.is_success() { EXIT_OK } else { EXIT_FAILED }
}

fn read_source(file: &Path) -> Result<String, i32> {
    let bytes = std::fs::read(file).map_err(|e| {
        eprintln!("error: cannot read {}: {e}", file.display());
        EXIT_SETUP
    })?;
    match String::from_utf8(bytes) {
        Ok(source) => Ok(source),
        Err(e) => {
            let offset = e.utf8_error().valid_up_to();
            eprintln!("error: {}: invalid UTF-8 at byte {offset}", file.display());
            Err(EXIT_FAILED)
        }
    }
}

fn check_file(file: &Path, recover: bool) -> i32 {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let options = ParseOptions { recover, deadline: None };
    let errors: Vec<SourceError> = match jparse::parse_source(&source, &options) {
        Ok(result) if result.is_ok() => {
            print!("{}", jparse::pretty::normalize(&result.ast));
            return EXIT_OK;
        }
        Ok(result) => result.errors.into_iter().map(SourceError::Parse).collect(),
        Err(FrontendError::Lex(e)) => vec![SourceError::Lex(e)],
        Err(FrontendError::Interrupted(e)) => {
            eprintln!("error: {e}");
            return EXIT_FAILED;
        }
    };
    let color = std::io::IsTerminal::is_terminal(&std::io::stderr());
    eprint!("{}", render_errors(&source, &errors, color));
    eprintln!("{}: {} error(s)", file.display(), errors.len());
    EXIT_FAILED
}

fn outline_file(file: &Path, format: Format) -> i32 {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let result = match jparse::parse_source(&source, &ParseOptions::default()) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {}: {err}", file.display());
            return EXIT_FAILED;
        }
    };
    if let Some(err) = result.errors.first() {
        let errors = [SourceError::Parse(err.clone())];
        eprint!("{}", render_errors(&source, &errors, false));
        return EXIT_FAILED;
    }
    let outline = jparse::outline::outline(&result.ast);
    match format {
        Format::Text => print!("{outline}"),
        Format::Json => match serde_json::to_string_pretty(&outline) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                return EXIT_FAILED;
            }
        },
    }
    EXIT_OK
}
