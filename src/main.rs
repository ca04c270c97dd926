mod db;
mod export;
mod fetch;
mod merge;
mod parser;
mod pipeline;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use db::MatchRecord;
use settings::Settings;

#[derive(Parser)]
#[command(name = "live_odds", about = "Collect live football odds at the interval into a local table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch live pages, keep interval matches, merge new rows into the store
    Run {
        /// Source page (repeatable; replaces configured URLs)
        #[arg(short, long = "url")]
        urls: Vec<String>,
        /// Store file
        #[arg(long = "db")]
        db_path: Option<PathBuf>,
        /// Clock substring a match must contain to be kept
        #[arg(short, long)]
        marker: Option<String>,
        /// Report what would be saved without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Extract matches from a saved HTML snapshot (no store access)
    Extract {
        #[arg(short, long)]
        file: PathBuf,
        /// Only print matches whose clock contains this substring
        #[arg(short, long)]
        marker: Option<String>,
    },
    /// Show stored matches, newest first
    Show {
        #[arg(long = "db")]
        db_path: Option<PathBuf>,
        /// Filter by league (substring)
        #[arg(short, long)]
        league: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// One JSON object per line instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write the whole store to an .xlsx sheet with the original column names
    Export {
        #[arg(long = "db")]
        db_path: Option<PathBuf>,
        /// Output workbook
        #[arg(short, long, default_value = export::DEFAULT_XLSX_PATH)]
        out: PathBuf,
    },
    /// Show store statistics
    Stats {
        #[arg(long = "db")]
        db_path: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
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

    let result = match cli.command {
        Commands::Run { urls, db_path, marker, dry_run } => {
            let settings = Settings::load()?.with_overrides(urls, db_path, marker);
            info!("Sources: {:?}", settings.urls);
            let date = chrono::Local::now().format("%d/%m/%Y").to_string();

            let records = pipeline::collect_all(&settings, &date).await?;
            println!("Elapsed: {:.2}s", t0.elapsed().as_secs_f64());
            println!("Collected matches: {}", records.len());
            if records.is_empty() {
                println!("No data to add.");
                return Ok(());
            }

            println!("Distinct clock values: {:?}", pipeline::distinct_clocks(&records));

            let applied =
                pipeline::apply(records, &settings.clock_marker, &settings.db_path, dry_run)?;
            print_table(&applied.filtered);
            println!("Matches with {:?}: {}", settings.clock_marker, applied.filtered.len());

            match applied.saved {
                Some(n) => println!("Saved {} rows to {:?}.", n, settings.db_path),
                None if applied.filtered.is_empty() => println!(
                    "No matches with {:?} in the clock. Nothing saved.",
                    settings.clock_marker
                ),
                None if dry_run => println!("Dry run: nothing saved."),
                None => println!("Nothing saved."),
            }
            Ok(())
        }
        Commands::Extract { file, marker } => {
            let records = extract_snapshot(&file, marker.as_deref())?;
            print_table(&records);
            Ok(())
        }
        Commands::Show { db_path, league, limit, json } => {
            let path = store_path(db_path)?;
            let Some(conn) = db::open_existing(&path)? else {
                println!("No store at {:?}.", path);
                return Ok(());
            };
            let rows = db::fetch_overview(&conn, league.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No matches found.");
                return Ok(());
            }
            if json {
                for r in &rows {
                    println!("{}", serde_json::to_string(r)?);
                }
            } else {
                print_table(&rows);
                println!("\n{} rows", rows.len());
            }
            Ok(())
        }
        Commands::Export { db_path, out } => {
            let path = store_path(db_path)?;
            let rows = db::load_all(&path)?;
            if rows.is_empty() {
                println!("No stored matches in {:?}. Nothing exported.", path);
                return Ok(());
            }
            let n = export::write_xlsx(&out, &rows)?;
            println!("Exported {} rows to {:?}.", n, out);
            Ok(())
        }
        Commands::Stats { db_path } => {
            let path = store_path(db_path)?;
            let Some(conn) = db::open_existing(&path)? else {
                println!("No store at {:?}.", path);
                return Ok(());
            };
            let s = db::get_stats(&conn)?;
            println!("Rows:     {}", s.rows);
            println!("Leagues:  {}", s.leagues);
            println!("Dates:    {}", s.dates);
            println!("First:    {}", s.first_date.as_deref().unwrap_or("-"));
            println!("Last:     {}", s.last_date.as_deref().unwrap_or("-"));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Parse a saved page. Needs neither configuration nor the store.
fn extract_snapshot(file: &Path, marker: Option<&str>) -> anyhow::Result<Vec<MatchRecord>> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {:?}", file))?;
    let date = chrono::Local::now().format("%d/%m/%Y").to_string();
    let mut records = parser::parse_snapshot(&html, &date);
    println!("Extracted {} matches", records.len());
    println!("Distinct clock values: {:?}", pipeline::distinct_clocks(&records));
    if let Some(m) = marker {
        records = merge::filter_by_clock(records, m);
        println!("Matches with {:?}: {}", m, records.len());
    }
    Ok(records)
}

/// `--db` if given, else the configured store path.
fn store_path(db_path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match db_path {
        Some(p) => Ok(p),
        None => Ok(Settings::load()?.db_path),
    }
}

fn print_table(rows: &[MatchRecord]) {
    if rows.is_empty() {
        return;
    }
    println!(
        "{:<10} | {:<10} | {:<10} | {:<20} | {:<20} | {:>5} | {:>5} | {:>5} | {:>5} | {:>4} | {:>4} | {}",
        "Date", "Score", "Clock", "Home", "Away", "1", "X", "2", "Total", "U", "O", "League"
    );
    println!("{}", "-".repeat(140));
    for r in rows {
        println!(
            "{:<10} | {:<10} | {:<10} | {:<20} | {:<20} | {:>5} | {:>5} | {:>5} | {:>5} | {:>4} | {:>4} | {}",
            r.date,
            truncate(&r.score, 10),
            truncate(&r.clock, 10),
            truncate(&r.home_team, 20),
            truncate(&r.away_team, 20),
            num(r.odds_home),
            num(r.odds_draw),
            num(r.odds_away),
            num(r.total_line_coefficient),
            num(r.total_under),
            num(r.total_over),
            r.league,
        );
    }
}

fn num(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "-".into())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_and_explicit_db_ignore_broken_config() {
        // Only this test touches the environment.
        std::env::set_var("LIVE_ODDS_TIMEOUT_SECS", "soon");
        assert!(Settings::load().is_err());

        let records =
            extract_snapshot(Path::new("tests/fixtures/live_popular.html"), Some("Пер.")).unwrap();
        assert_eq!(records.len(), 2);

        let p = store_path(Some(PathBuf::from("elsewhere.sqlite"))).unwrap();
        assert_eq!(p, PathBuf::from("elsewhere.sqlite"));
        assert!(store_path(None).is_err());

        std::env::remove_var("LIVE_ODDS_TIMEOUT_SECS");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("Арсенал", 10), "Арсенал");
        assert_eq!(truncate("Манчестер Юнайтед", 9), "Манчестер...");
    }
}
