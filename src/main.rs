//! Command-line entry point for the PDF password search utility.

use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use pdf_pwsearch::{
    Charset, EngineConfig, LockedDocument, PdfOracle, SearchBudget, SearchError, SearchMode,
    SearchResult, Searcher, Wordlist,
};

/// Exit status when the search space was covered (or budget spent) without a match.
const EXIT_NOT_FOUND: i32 = 2;
/// Exit status for document, wordlist, or verification failures.
const EXIT_FAILURE: i32 = 3;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// CLI arguments supported by pdf-pwsearch.
struct Cli {
    /// Path to the password-protected PDF
    #[arg(short = 'i', long = "input", value_name = "PDF", required = true)]
    input: PathBuf,

    /// Try each line of this file instead of brute-forcing
    #[arg(short = 'w', long = "wordlist", value_name = "FILE")]
    wordlist: Option<PathBuf>,

    /// Minimum password length to brute-force
    #[arg(long = "min", default_value_t = 1)]
    min: usize,

    /// Maximum password length to brute-force
    #[arg(long = "max", default_value_t = 4)]
    max: usize,

    /// Include digits in the candidate alphabet
    #[arg(short = 'd', long = "digit", action = ArgAction::SetTrue)]
    digit: bool,

    /// Include alphabetic characters in the candidate alphabet
    #[arg(short = 'a', long = "alphabet", action = ArgAction::SetTrue)]
    alphabet: bool,

    /// Include common symbols in the candidate alphabet
    #[arg(short = 's', long = "symbol", action = ArgAction::SetTrue)]
    symbol: bool,

    /// Exact candidate alphabet, in order (overrides -d/-a/-s)
    #[arg(short = 'c', long = "charset", value_name = "CHARS")]
    charset: Option<String>,

    /// Number of worker threads to use for password attempts
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,

    /// Stop after this many attempts
    #[arg(long = "max-attempts", value_name = "N")]
    max_attempts: Option<u64>,

    /// Stop after this many seconds
    #[arg(long = "max-seconds", value_name = "SECS")]
    max_seconds: Option<u64>,

    /// Refuse brute-force keyspaces larger than this
    #[arg(long = "max-keyspace", value_name = "N")]
    max_keyspace: Option<u64>,

    /// Log worker activity to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Entrypoint that installs logging, runs the search, and maps the outcome to an exit status.
fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit(match e.downcast_ref::<SearchError>() {
                Some(SearchError::Document(_) | SearchError::NotEncrypted) => EXIT_FAILURE,
                _ => 1,
            });
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the search from flags, run it behind a progress bar, and report.
fn run(args: &Cli) -> Result<i32> {
    let mode = search_mode(args);

    let mut config = EngineConfig::new();
    if let Some(limit) = args.max_keyspace {
        config = config.with_max_keyspace(limit);
    }

    let mut budget = SearchBudget::unbounded();
    if let Some(attempts) = args.max_attempts {
        budget = budget.with_max_attempts(attempts);
    }
    if let Some(secs) = args.max_seconds {
        budget = budget.with_max_duration(Duration::from_secs(secs));
    }

    let document = LockedDocument::from_path(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    println!("PDF: {}", args.input.display());
    match &mode {
        SearchMode::Dictionary(_) => println!("Mode: dictionary"),
        SearchMode::BruteForce { charset, length } => {
            println!("Length: {length}");
            println!("Charset size: {}", charset.chars().count());
        }
        SearchMode::Incremental {
            charset,
            min_length,
            max_length,
        } => {
            println!("Min length: {min_length}");
            println!("Max length: {max_length}");
            println!("Charset size: {}", charset.chars().count());
        }
    }

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {percent:>3}% [{wide_bar:.cyan/blue}] ({eta} remaining)",
        )
        .context("invalid progress template")?,
    );

    let searcher = Searcher::new()
        .with_config(config)
        .with_progress(progress.clone());
    let result = searcher.run(&PdfOracle, &document, &mode, budget, args.threads);
    progress.finish_and_clear();
    let result = result?;

    println!("Attempts: {}", result.attempts());
    let code = match &result {
        SearchResult::Found { password, .. } => {
            println!("Password found: {password}");
            match PdfOracle.confirm(&document, password) {
                Ok(()) => {
                    println!("Done");
                    0
                }
                Err(e) => {
                    eprintln!("Unexpected error re-opening PDF with discovered password: {e:#}");
                    EXIT_FAILURE
                }
            }
        }
        SearchResult::Exhausted { .. } => {
            println!("Password not found in provided search space.");
            EXIT_NOT_FOUND
        }
        SearchResult::BudgetExceeded { .. } => {
            println!("Budget exhausted before the password was found.");
            EXIT_NOT_FOUND
        }
        SearchResult::Failed { reason, .. } => {
            eprintln!("Search failed: {reason}");
            EXIT_FAILURE
        }
    };
    println!("Elapsed: {:.2?}", result.elapsed());
    Ok(code)
}

/// Translate flags into a search mode; a wordlist takes priority over brute force.
fn search_mode(args: &Cli) -> SearchMode {
    if let Some(path) = &args.wordlist {
        return SearchMode::Dictionary(Wordlist::from_path(path));
    }

    let charset = match &args.charset {
        Some(chars) => chars.clone(),
        None => Charset::from_classes(args.digit, args.alphabet, args.symbol)
            .as_slice()
            .iter()
            .collect(),
    };
    if args.min == args.max {
        SearchMode::BruteForce {
            charset,
            length: args.min,
        }
    } else {
        SearchMode::Incremental {
            charset,
            min_length: args.min,
            max_length: args.max,
        }
    }
}
