use std::collections::HashSet;

use crate::db::MatchRecord;

/// Marker the source site puts in the clock of matches at the interval.
pub const DEFAULT_CLOCK_MARKER: &str = "Пер.";

/// Keep records whose clock contains `marker` anywhere.
pub fn filter_by_clock(records: Vec<MatchRecord>, marker: &str) -> Vec<MatchRecord> {
    records
        .into_iter()
        .filter(|r| r.clock.contains(marker))
        .collect()
}

#[derive(Debug, PartialEq)]
pub enum MergeOutcome {
    /// Nothing new passed the filter; the store must not be touched.
    NoOp,
    /// Full contents to write back.
    Write(Vec<MatchRecord>),
}

/// Hashable view of a record covering every field.
#[derive(Hash, PartialEq, Eq)]
struct RowKey<'a> {
    text: [&'a str; 6],
    numbers: [Option<u64>; 6],
}

impl<'a> RowKey<'a> {
    fn of(r: &'a MatchRecord) -> Self {
        // -0.0 and 0.0 are equal as numbers, so give them one key.
        let bits = |v: Option<f64>| v.map(|n| if n == 0.0 { 0 } else { n.to_bits() });
        RowKey {
            text: [&r.date, &r.score, &r.clock, &r.home_team, &r.away_team, &r.league],
            numbers: [
                bits(r.odds_home),
                bits(r.odds_draw),
                bits(r.odds_away),
                bits(r.total_line_coefficient),
                bits(r.total_under),
                bits(r.total_over),
            ],
        }
    }
}

/// Drop rows equal in every field to an earlier row, keeping order.
pub fn dedup_rows(rows: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let mut seen: HashSet<RowKey> = HashSet::with_capacity(rows.len());
    let keep: Vec<bool> = rows.iter().map(|r| seen.insert(RowKey::of(r))).collect();
    drop(seen);
    rows.into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect()
}

/// Union the stored rows with the fresh ones (stored first) and dedup.
pub fn merge(prior: Vec<MatchRecord>, fresh: Vec<MatchRecord>) -> MergeOutcome {
    if fresh.is_empty() {
        return MergeOutcome::NoOp;
    }
    let mut combined = prior;
    combined.extend(fresh);
    MergeOutcome::Write(dedup_rows(combined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sample;

    #[test]
    fn filter_is_substring_match() {
        let rows = vec![
            sample("A", "B", "Пер."),
            sample("C", "D", "45'"),
            sample("E", "F", "1-й тайм Пер. 2"),
            sample("G", "H", "-"),
        ];
        let kept = filter_by_clock(rows, DEFAULT_CLOCK_MARKER);
        let homes: Vec<_> = kept.iter().map(|r| r.home_team.as_str()).collect();
        assert_eq!(homes, vec!["A", "E"]);
    }

    #[test]
    fn union_keeps_first_seen_order() {
        let a = sample("A", "x", "Пер.");
        let b = sample("B", "x", "Пер.");
        let c = sample("C", "x", "Пер.");
        let out = merge(vec![a.clone(), b.clone()], vec![b.clone(), c.clone()]);
        assert_eq!(out, MergeOutcome::Write(vec![a, b, c]));
    }

    #[test]
    fn empty_fresh_is_noop() {
        assert_eq!(merge(vec![sample("A", "B", "Пер.")], Vec::new()), MergeOutcome::NoOp);
        assert_eq!(merge(Vec::new(), Vec::new()), MergeOutcome::NoOp);
    }

    #[test]
    fn rows_differing_in_one_field_both_survive() {
        let a = sample("A", "B", "Пер.");
        let mut a2 = a.clone();
        a2.odds_home = Some(1.86);
        let mut a3 = a.clone();
        a3.odds_away = Some(2.0);
        let out = merge(vec![a.clone()], vec![a2.clone(), a3.clone(), a.clone()]);
        assert_eq!(out, MergeOutcome::Write(vec![a, a2, a3]));
    }

    #[test]
    fn merge_is_idempotent() {
        let fresh = vec![sample("A", "B", "Пер."), sample("C", "D", "Пер.")];
        let MergeOutcome::Write(first) = merge(Vec::new(), fresh.clone()) else {
            panic!("expected write");
        };
        let MergeOutcome::Write(second) = merge(first.clone(), fresh) else {
            panic!("expected write");
        };
        assert_eq!(first, second);
    }

    #[test]
    fn dedup_collapses_prior_duplicates() {
        let a = sample("A", "B", "Пер.");
        assert_eq!(dedup_rows(vec![a.clone(), a.clone()]), vec![a]);
    }
}
