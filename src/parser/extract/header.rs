use scraper::ElementRef;

use crate::db::SENTINEL;
use crate::parser::fields::split_score_clock;
use crate::parser::markup::{
    find_previous, next_sibling_named, select_text, text_of, LEAGUE_CELL, LEAGUE_HEADING,
    MEMBER_NUMBER, SCORE_CLOCK,
};

/// League heading of the nearest category label above the row.
pub fn league(row: ElementRef) -> String {
    find_previous(row, &LEAGUE_CELL)
        .and_then(|cell| select_text(cell, &LEAGUE_HEADING))
        .unwrap_or_else(|| SENTINEL.to_string())
}

/// Team names in document order: the `div` following each member-number marker.
pub fn team_names(row: ElementRef) -> Vec<String> {
    row.select(&MEMBER_NUMBER)
        .filter_map(|marker| next_sibling_named(marker, "div"))
        .map(text_of)
        .collect()
}

/// (home, away), each defaulting to the sentinel.
pub fn home_away(names: &[String]) -> (String, String) {
    let pick = |i: usize| names.get(i).cloned().unwrap_or_else(|| SENTINEL.to_string());
    (pick(0), pick(1))
}

pub fn score_and_clock(row: ElementRef) -> (String, String) {
    match row.select(&SCORE_CLOCK).next() {
        Some(node) => split_score_clock(&text_of(node)),
        None => (SENTINEL.to_string(), SENTINEL.to_string()),
    }
}
