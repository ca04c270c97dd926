use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{info, warn};

use crate::db::{self, MatchRecord};
use crate::fetch::{self, FetchError};
use crate::merge::{self, MergeOutcome};
use crate::parser;
use crate::settings::Settings;

/// Fetch and extract one source. Any failure here is confined to this URL.
pub async fn collect_source(
    client: &Client,
    url: &str,
    date: &str,
) -> Result<Vec<MatchRecord>, FetchError> {
    let html = fetch::fetch_page(client, url).await?;
    let records = parser::parse_snapshot(&html, date);
    info!("{}: {} match rows", url, records.len());
    Ok(records)
}

/// Records from every configured URL, in URL order. Failed sources add nothing.
pub async fn collect_all(settings: &Settings, date: &str) -> Result<Vec<MatchRecord>> {
    let client = fetch::build_client(settings)?;

    let pb = ProgressBar::new(settings.urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")?,
    );

    let mut records = Vec::new();
    for url in &settings.urls {
        pb.set_message(url.clone());
        match collect_source(&client, url, date).await {
            Ok(rows) => records.extend(rows),
            Err(e) => warn!("Skipping {}: {}", url, e),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(records)
}

/// Distinct clock values in first-seen order.
pub fn distinct_clocks(records: &[MatchRecord]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for r in records {
        if !seen.contains(&r.clock.as_str()) {
            seen.push(&r.clock);
        }
    }
    seen
}

pub struct Applied {
    pub filtered: Vec<MatchRecord>,
    /// Rows in the store after the write; `None` when nothing was written.
    pub saved: Option<usize>,
}

/// Filter, merge against the store at `db_path`, and persist unless `dry_run`.
pub fn apply(
    records: Vec<MatchRecord>,
    marker: &str,
    db_path: &Path,
    dry_run: bool,
) -> Result<Applied> {
    let filtered = merge::filter_by_clock(records, marker);
    if filtered.is_empty() {
        return Ok(Applied { filtered, saved: None });
    }

    let prior = db::load_all(db_path)?;
    info!("Loaded {} stored rows from {:?}", prior.len(), db_path);

    let saved = match merge::merge(prior, filtered.clone()) {
        MergeOutcome::NoOp => None,
        MergeOutcome::Write(rows) if dry_run => {
            info!("Dry run: would write {} rows", rows.len());
            None
        }
        MergeOutcome::Write(rows) => Some(db::replace_all(db_path, &rows)?),
    };

    Ok(Applied { filtered, saved })
}
