use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use linescout::{scan, ConsoleSink, ScanConfig, ScanSummary};
use rand::Rng;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory tree for lines containing a substring
    Scan {
        /// Substring to search for (literal, case-sensitive)
        needle: String,

        /// Root directory to scan
        #[arg(short = 'd', long, default_value = ".")]
        root: PathBuf,

        /// Number of worker threads (default: logical CPU count)
        #[arg(short = 'j', long)]
        threads: Option<NonZeroUsize>,

        /// Path to a config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print summary statistics after the scan
        #[arg(short, long)]
        stats: bool,
    },

    /// Generate a directory of random text files to scan against
    Gen {
        /// Directory to create the files in
        dir: PathBuf,

        /// Number of files to generate
        #[arg(short = 'n', long, default_value = "30")]
        count: usize,

        /// Approximate size of each file in megabytes
        #[arg(long, default_value = "1")]
        size_mb: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            needle,
            root,
            threads,
            config,
            stats,
        } => {
            let mut cli_config = ScanConfig::new(root, needle);
            if let Some(threads) = threads {
                cli_config.thread_count = threads;
            }

            let scan_config = match config {
                Some(path) => {
                    let file_config = ScanConfig::load_from(Some(&path))
                        .with_context(|| format!("failed to load config {}", path.display()))?;
                    file_config.merge_with_cli(cli_config)
                }
                None => cli_config,
            };

            init_logging(&scan_config.log_level);

            let sink = ConsoleSink::new();
            let summary = scan(&scan_config, &sink)?;

            if stats {
                print_summary(&summary);
            }
            Ok(())
        }
        Commands::Gen { dir, count, size_mb } => generate_fixtures(&dir, count, size_mb),
    }
}

fn init_logging(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    // Logs go to stderr so stdout stays a clean match stream.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &ScanSummary) {
    println!(
        "Found {} matches in {} files ({} skipped)",
        summary.matches_found.to_string().green(),
        summary.files_scanned,
        summary.files_skipped
    );
    if summary.workers_failed > 0 {
        println!(
            "{} worker(s) did not finish; results are partial",
            summary.workers_failed.to_string().red()
        );
    }
}

fn generate_fixtures(dir: &Path, count: usize, size_mb: u64) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    println!("Generating {} random text files ({}MB each)...", count, size_mb);
    let mut rng = rand::thread_rng();
    for i in 1..=count {
        let path = dir.join(format!("random_file_{}.txt", i));
        generate_random_file(&path, size_mb * 1024 * 1024, &mut rng)
            .with_context(|| format!("failed to generate {}", path.display()))?;
        println!("Generated file {} of {}: {}", i, count, path.display());
    }
    println!("Successfully generated all test files.");
    Ok(())
}

fn generate_random_file(
    path: &Path,
    target_bytes: u64,
    rng: &mut impl Rng,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut written = 0u64;
    let mut line = Vec::with_capacity(128);

    while written < target_bytes {
        line.clear();
        let line_len = rng.gen_range(20..100);
        for _ in 0..line_len {
            // Printable ASCII
            line.push(rng.gen_range(32u8..127u8));
        }
        line.push(b'\n');
        writer.write_all(&line)?;
        written += line.len() as u64;
    }

    writer.flush()
}
