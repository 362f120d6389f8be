use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use sigscout::{load_signatures, ScanConfig, ScanEngine, ScanReport, ScanStatus};
use std::io::Read;
use std::num::{NonZeroU64, NonZeroUsize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Signature-based byte sequence scanner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan files or directory trees against a signature list
    Scan(ScanArgs),

    /// Scan bytes piped to standard input
    Stdin(StdinArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// Files or directories to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Args)]
struct StdinArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct CommonArgs {
    /// Signature list file, one `<bytes>.{<identifier>}` entry per line
    #[arg(short, long)]
    signatures: PathBuf,

    /// Logical chunk size in bytes for file scans
    #[arg(short = 'c', long)]
    chunk_size: Option<NonZeroU64>,

    /// Number of scan threads (default: CPU count, capped by signature count)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Custom configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit one JSON report object per scanned input
    #[arg(long)]
    json: bool,
}

/// Exit code when at least one input had a detection.
const EXIT_NOT_CLEAN: i32 = 1;
/// Exit code for scan failures and fatal errors.
const EXIT_ERROR: i32 = 2;

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Scan(args) => scan_paths(args),
        Commands::Stdin(args) => scan_stdin(args),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env("SIGSCOUT_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolves the effective configuration and builds the engine.
fn build_engine(common: &CommonArgs) -> Result<ScanEngine> {
    let file_config = ScanConfig::load_from(common.config.as_deref())
        .context("loading configuration")?;

    let mut cli_config = ScanConfig::default();
    if let Some(chunk_size) = common.chunk_size {
        cli_config.chunk_size = chunk_size;
    }
    if let Some(threads) = common.threads {
        cli_config.thread_count = threads;
    }
    if let Some(level) = &common.log_level {
        cli_config.log_level = level.clone();
    }
    let config = file_config.merge_with_cli(cli_config);

    init_logging(&config.log_level);

    let signatures = load_signatures(&common.signatures).with_context(|| {
        format!("loading signatures from {}", common.signatures.display())
    })?;
    let engine = ScanEngine::new(signatures, &config)?;
    Ok(engine)
}

/// Expands the given paths into a flat, sorted list of files to scan.
/// Directories are walked recursively; hidden files are not skipped.
fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let walker = WalkBuilder::new(path).standard_filters(false).build();
            for entry in walker {
                match entry {
                    Ok(entry) => {
                        if entry.file_type().is_some_and(|kind| kind.is_file()) {
                            files.push(entry.into_path());
                        }
                    }
                    Err(err) => warn!("skipping unreadable entry: {err}"),
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files
}

fn scan_paths(args: ScanArgs) -> Result<i32> {
    let engine = build_engine(&args.common)?;
    let files = collect_files(&args.paths);
    let started = Instant::now();

    let progress = if args.no_progress || args.common.json || files.len() < 2 {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} {msg}",
        )?);
        bar
    };

    let mut not_clean = 0usize;
    let mut failed = 0usize;
    for file in &files {
        progress.set_message(file.display().to_string());
        let report = engine.scan_file(file);
        if report.status != ScanStatus::Success {
            failed += 1;
        }
        if !report.clean() {
            not_clean += 1;
        }
        progress.suspend(|| print_report(file, &report, args.common.json));
        progress.inc(1);
    }
    progress.finish_and_clear();

    if !args.common.json {
        let elapsed = Duration::from_millis(started.elapsed().as_millis() as u64);
        println!(
            "\nScanned {} files in {}: {} not clean, {} failed",
            files.len(),
            humantime::format_duration(elapsed),
            not_clean,
            failed
        );
    }
    engine.metrics().log_stats();

    if failed > 0 {
        Ok(EXIT_ERROR)
    } else if not_clean > 0 {
        Ok(EXIT_NOT_CLEAN)
    } else {
        Ok(0)
    }
}

fn scan_stdin(args: StdinArgs) -> Result<i32> {
    let engine = build_engine(&args.common)?;

    let mut data = Vec::new();
    std::io::stdin()
        .read_to_end(&mut data)
        .context("reading standard input")?;

    let report = engine.scan_bytes(&data);
    print_report(Path::new("<stdin>"), &report, args.common.json);
    engine.metrics().log_stats();

    Ok(if report.clean() { 0 } else { EXIT_NOT_CLEAN })
}

fn print_report(path: &Path, report: &ScanReport, json: bool) {
    if json {
        let line = serde_json::json!({
            "path": path.display().to_string(),
            "status": report.status,
            "matches": &report.matches,
        });
        println!("{line}");
        return;
    }

    match report.status {
        ScanStatus::Success if report.clean() => {
            println!("{}: {}", path.display(), "OK".green());
        }
        ScanStatus::Success => {
            println!("{}: {}", path.display(), "NOT CLEAN!".red().bold());
            print_matches(report);
        }
        status => {
            println!(
                "{}: {} ({})",
                path.display(),
                "SCAN FAILED".yellow().bold(),
                status
            );
            // A seek error mid-file still leaves partial findings.
            if !report.clean() {
                print_matches(report);
            }
        }
    }
}

fn print_matches(report: &ScanReport) {
    for (index, guid) in report.matches.iter().enumerate() {
        println!("  {}. found sequence with guid = {}", index + 1, guid);
    }
}
