pub mod extract;
pub mod fields;
pub mod markup;

use scraper::Html;

use crate::db::MatchRecord;

/// Parse one page snapshot and collect its match records.
pub fn parse_snapshot(html: &str, date: &str) -> Vec<MatchRecord> {
    let doc = Html::parse_document(html);
    extract::extract_matches(&doc, date).collect()
}
