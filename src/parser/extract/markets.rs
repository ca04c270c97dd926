use scraper::{ElementRef, Selector};

use crate::parser::fields::{strip_coefficient, to_float};
use crate::parser::markup::{
    own_text_nodes, select_text, text_of, ODDS_AWAY, ODDS_DRAW, ODDS_HOME, SPAN, TOTAL_CELL,
};

pub struct ResultOdds {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

pub struct Totals {
    pub coefficient: Option<f64>,
    pub under: Option<f64>,
    pub over: Option<f64>,
}

fn selection(row: ElementRef, selector: &Selector) -> Option<f64> {
    to_float(select_text(row, selector).as_deref())
}

/// 1X2 prices of the match-result market.
pub fn result_odds(row: ElementRef) -> ResultOdds {
    ResultOdds {
        home: selection(row, &ODDS_HOME),
        draw: selection(row, &ODDS_DRAW),
        away: selection(row, &ODDS_AWAY),
    }
}

/// Totals market. Lines come only from cells that carry a `span`, while
/// coefficients are read per cell, so the two lists are aligned by position
/// alone and can drift apart on irregular markup.
pub fn totals(row: ElementRef) -> Totals {
    let cells: Vec<ElementRef> = row.select(&TOTAL_CELL).collect();

    let lines: Vec<Option<f64>> = cells
        .iter()
        .filter_map(|cell| cell.select(&SPAN).next())
        .map(|span| to_float(Some(text_of(span).as_str())))
        .collect();

    let coefficients: Vec<Option<f64>> = cells
        .iter()
        .map(|cell| {
            own_text_nodes(*cell)
                .find(|t| t.contains('('))
                .and_then(|t| to_float(Some(strip_coefficient(t))))
        })
        .collect();

    Totals {
        coefficient: coefficients.first().copied().flatten(),
        under: lines.first().copied().flatten(),
        over: lines.get(1).copied().flatten(),
    }
}
