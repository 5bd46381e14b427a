use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use legislative_activity::parser::{self, Record, RecordBuilder};
use legislative_activity::report::TracingReporter;
use legislative_activity::settings::Settings;
use legislative_activity::{fetch, output};

#[derive(Parser)]
#[command(
    name = "legislative_activity",
    about = "Current legislative activity scraper for congress.gov"
)]
struct Cli {
    /// Settings file (default: legislative_activity.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the configured page and extract the current activity record
    Crawl {
        /// Output file (.jl/.jsonl for JSON lines, anything else for a JSON array)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract records from saved HTML documents
    Parse {
        /// HTML files to process
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Capture time to stamp on the records, RFC 3339 (default: now)
        #[arg(long)]
        captured_at: Option<DateTime<Utc>>,
        /// Output file (.jl/.jsonl for JSON lines, anything else for a JSON array)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the compiled path expressions
    Paths,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let paths = settings.path_set()?;
    let builder = RecordBuilder::new(paths).with_reporter(Arc::new(TracingReporter));

    let result = match cli.command {
        Commands::Crawl { output } => {
            let output = output.or_else(|| settings.output.clone());
            crawl(&settings, &builder, output.as_deref()).await
        }
        Commands::Parse {
            files,
            captured_at,
            output,
        } => {
            let output = output.or_else(|| settings.output.clone());
            let captured_at = captured_at.unwrap_or_else(Utc::now);
            parse_files(&builder, &files, captured_at, output.as_deref())
        }
        Commands::Paths => {
            for (name, path) in builder.paths().named() {
                println!("{:<10} {}", name, path);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {}", format_duration(elapsed));
    }

    result
}

async fn crawl(
    settings: &Settings,
    builder: &RecordBuilder,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let client = fetch::client(settings)?;
    let page = fetch::fetch_page(&client, &settings.start_url, settings.max_retries).await?;

    let record = parser::process_page(builder, &page.body, page.captured_at)
        .with_context(|| format!("Layout mismatch on {}", page.url))?;

    output::write_records(output, std::slice::from_ref(&record))
}

fn parse_files(
    builder: &RecordBuilder,
    files: &[PathBuf],
    captured_at: DateTime<Utc>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            let result = parse_file(builder, path, captured_at);
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut records = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (path, result) in results {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                failed += 1;
                error!(file = %path.display(), "{:#}", e);
            }
        }
    }

    if !records.is_empty() {
        output::write_records(output, &records)?;
    }
    info!("Extracted {} records ({} failed)", records.len(), failed);

    if failed > 0 {
        bail!("{} of {} documents failed extraction", failed, files.len());
    }
    Ok(())
}

fn parse_file(
    builder: &RecordBuilder,
    path: &Path,
    captured_at: DateTime<Utc>,
) -> anyhow::Result<Record> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let record = parser::process_page(builder, &html, captured_at)
        .with_context(|| format!("Layout mismatch in {}", path.display()))?;
    Ok(record)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
