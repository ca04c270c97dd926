pub mod header;
pub mod markets;

use scraper::{ElementRef, Html};

use super::markup::MATCH_ROW;
use crate::db::MatchRecord;

/// Lazily turn every match row of `doc` into a record. Rows are never
/// skipped: missing pieces fall back to the sentinel or `None`.
pub fn extract_matches<'a>(doc: &'a Html, date: &'a str) -> impl Iterator<Item = MatchRecord> + 'a {
    doc.select(&MATCH_ROW).map(move |row| extract_row(row, date))
}

pub fn extract_row(row: ElementRef, date: &str) -> MatchRecord {
    let (score, clock) = header::score_and_clock(row);
    let (home_team, away_team) = header::home_away(&header::team_names(row));
    let odds = markets::result_odds(row);
    let totals = markets::totals(row);

    MatchRecord {
        date: date.to_string(),
        score,
        clock,
        home_team,
        away_team,
        odds_home: odds.home,
        odds_draw: odds.draw,
        odds_away: odds.away,
        total_line_coefficient: totals.coefficient,
        total_under: totals.under,
        total_over: totals.over,
        league: header::league(row),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "19/10/2026";

    fn parse(fixture: &str) -> Vec<MatchRecord> {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", fixture)).unwrap();
        let doc = Html::parse_document(&html);
        extract_matches(&doc, DATE).collect()
    }

    fn parse_str(html: &str) -> Vec<MatchRecord> {
        let doc = Html::parse_document(html);
        extract_matches(&doc, DATE).collect()
    }

    #[test]
    fn fixture_yields_every_row() {
        let rows = parse("live_popular");
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.date == DATE));
    }

    #[test]
    fn full_row() {
        let rows = parse("live_popular");
        let r = &rows[0];
        assert_eq!(r.league, "Футбол. Англия. Премьер-лига");
        assert_eq!(r.home_team, "Арсенал");
        assert_eq!(r.away_team, "Челси");
        assert_eq!(r.score, "1:0 (1:0)");
        assert_eq!(r.clock, "Пер.");
        assert_eq!(r.odds_home, Some(1.85));
        assert_eq!(r.odds_draw, Some(3.4));
        assert_eq!(r.odds_away, Some(4.5));
        assert_eq!(r.total_line_coefficient, Some(1.9));
        assert_eq!(r.total_under, Some(2.5));
        assert_eq!(r.total_over, Some(3.5));
    }

    #[test]
    fn sparse_row_degrades_to_defaults() {
        let rows = parse("live_popular");
        let r = &rows[1];
        assert_eq!(r.league, "Футбол. Англия. Премьер-лига");
        assert_eq!(r.home_team, "Брентфорд");
        assert_eq!(r.away_team, "-");
        assert_eq!((r.score.as_str(), r.clock.as_str()), ("-", "-"));
        assert_eq!(r.odds_home, None);
        assert_eq!(r.odds_draw, None);
        assert_eq!(r.odds_away, None);
        assert_eq!(r.total_line_coefficient, None);
        assert_eq!(r.total_under, None);
        assert_eq!(r.total_over, None);
    }

    #[test]
    fn league_follows_nearest_label() {
        let rows = parse("live_popular");
        assert_eq!(rows[2].league, "Футбол. Испания. Примера");
        assert_eq!(rows[3].league, "Футбол. Испания. Примера");
    }

    #[test]
    fn totals_pair_by_position() {
        // First cell has a coefficient but no line; lines shift left.
        let r = &parse("live_popular")[2];
        assert_eq!(r.total_line_coefficient, Some(2.1));
        assert_eq!(r.total_under, Some(2.5));
        assert_eq!(r.total_over, Some(1.5));
        assert_eq!(r.score, "1:0 (0:0)");
        assert_eq!(r.clock, "45' +2");
    }

    #[test]
    fn totals_second_cell_without_coefficient() {
        let rows = parse_str(
            r#"<table><tr class="sub-row">
                <td data-market-type="TOTAL"><span>2.5</span>(1.90)</td>
                <td data-market-type="TOTAL"><span>3.5</span></td>
            </tr></table>"#,
        );
        assert_eq!(rows[0].total_line_coefficient, Some(1.9));
        assert_eq!(rows[0].total_under, Some(2.5));
        assert_eq!(rows[0].total_over, Some(3.5));
    }

    #[test]
    fn empty_row_is_still_emitted() {
        let rows = parse_str(r#"<table><tr class="sub-row"><td></td></tr></table>"#);
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.league, "-");
        assert_eq!(r.home_team, "-");
        assert_eq!(r.away_team, "-");
        assert_eq!(r.score, "-");
        assert_eq!(r.clock, "-");
        assert!(r.odds_home.is_none() && r.total_under.is_none());
    }

    #[test]
    fn label_without_heading_is_sentinel() {
        let rows = parse_str(
            r#"<table>
                <tr><td class="category-label-td">no heading</td></tr>
                <tr class="sub-row"><td></td></tr>
            </table>"#,
        );
        assert_eq!(rows[0].league, "-");
    }

    #[test]
    fn marker_without_name_is_skipped() {
        let rows = parse_str(
            r#"<table><tr class="sub-row"><td>
                <b class="member-number">1.</b>
                <div><b class="member-number">2.</b><span>x</span></div>
                <b class="member-number">3.</b><div>Away side</div>
            </td></tr></table>"#,
        );
        // Marker 1 takes the wrapping div's text, marker 2 has no div sibling.
        assert_eq!(rows[0].home_team, "2.x");
        assert_eq!(rows[0].away_team, "Away side");
    }

    #[test]
    fn no_rows_no_records() {
        assert!(parse_str("<html><body><p>maintenance</p></body></html>").is_empty());
    }
}
