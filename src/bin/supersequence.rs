use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use supersequence_dp::signature::root_signature;
use supersequence_dp::utils::{DEFAULT_CACHE_FILE, DEFAULT_MEMORY_THRESHOLD};
use supersequence_dp::{
    BackendChoice, DigitSequence, FillOrder, SupersequenceEngineBuilder, SupersequenceError,
};
use tracing_subscriber::EnvFilter;

/// Print the smallest integer containing both inputs as digit subsequences.
#[derive(Parser, Debug)]
#[command(name = "supersequence", version, about)]
struct Cli {
    /// First input: a decimal digit string (or integer list with --roots).
    first: String,

    /// Second input: a decimal digit string (or integer list with --roots).
    second: String,

    /// Path of the on-disk cost table; must not exist when the run starts.
    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    cache_path: PathBuf,

    /// Largest estimated table size, in bytes, kept in memory when
    /// --backend=auto.
    #[arg(long, default_value_t = DEFAULT_MEMORY_THRESHOLD)]
    memory_threshold: usize,

    #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
    backend: BackendArg,

    #[arg(long, value_enum, default_value_t = OrderArg::RowMajor)]
    order: OrderArg,

    /// Treat inputs as comma-separated integers and merge their digit-root
    /// signatures.
    #[arg(long)]
    roots: bool,

    /// Emit a JSON report instead of the bare digits.
    #[arg(long)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Auto,
    Memory,
    Disk,
}

impl From<BackendArg> for BackendChoice {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => BackendChoice::Auto,
            BackendArg::Memory => BackendChoice::Memory,
            BackendArg::Disk => BackendChoice::Disk,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    RowMajor,
    AntiDiagonal,
}

impl From<OrderArg> for FillOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::RowMajor => FillOrder::RowMajor,
            OrderArg::AntiDiagonal => FillOrder::AntiDiagonal,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("supersequence: {err}");
            match err {
                CliError::Engine(SupersequenceError::StaleCache { .. }) => ExitCode::from(3),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Engine(#[from] SupersequenceError),
    #[error("invalid integer list: {0}")]
    Roots(String),
    #[error("cannot encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let a = read_input(&cli.first, cli.roots)?;
    let b = read_input(&cli.second, cli.roots)?;

    let engine = SupersequenceEngineBuilder::new()
        .cache_path(&cli.cache_path)
        .memory_threshold(cli.memory_threshold)
        .backend(cli.backend.into())
        .order(cli.order.into())
        .build();
    let report = engine.run_report(&a, &b)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.result);
    }
    Ok(())
}

fn read_input(raw: &str, roots: bool) -> Result<DigitSequence, CliError> {
    if !roots {
        return Ok(DigitSequence::parse(raw)?);
    }
    let values = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().map_err(|e| CliError::Roots(format!("{s:?}: {e}"))))
        .collect::<Result<Vec<u64>, CliError>>()?;
    Ok(root_signature(values))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
