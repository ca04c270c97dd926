use tracing::debug;

use crate::db::SENTINEL;

const EM_DASH: &str = "—";

/// Convert a cell's text to odds/line value. Sentinels, blanks and anything
/// that does not parse to a finite decimal become `None`.
pub fn to_float(value: Option<&str>) -> Option<f64> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == SENTINEL || trimmed == EM_DASH {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        Ok(_) | Err(_) => {
            debug!(value = raw, "not a decimal, storing null");
            None
        }
    }
}

/// Split the live "score clock" line into (score, clock).
///
/// Two tokens are score and clock. With more, a parenthesized second token is
/// the half-time sub-score and stays with the score; otherwise the second
/// token is dropped. Everything from the third token on is the clock.
pub fn split_score_clock(text: &str) -> (String, String) {
    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.len() {
        2 => (parts[0].to_string(), parts[1].to_string()),
        n if n > 2 => {
            let score = if parts[1].contains('(') {
                format!("{} {}", parts[0], parts[1])
            } else {
                parts[0].to_string()
            };
            (score, parts[2..].join(" "))
        }
        _ => (SENTINEL.to_string(), SENTINEL.to_string()),
    }
}

/// Coefficient text of a totals cell, e.g. " (1.90)\n" -> "1.90".
pub fn strip_coefficient(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '(' || c == ')')
}
