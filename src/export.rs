use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::db::MatchRecord;

pub const DEFAULT_XLSX_PATH: &str = "live.xlsx";

/// Sheet headers, in `MatchRecord` field order.
pub const HEADERS: [&str; 12] = [
    "Дата", "Счет", "Время", "Хозяева", "Гости", "П1", "Х", "П2", "тотал", "ТМ", "ТБ", "Лига",
];

fn write_opt(sheet: &mut Worksheet, row: u32, col: u16, v: Option<f64>) -> Result<(), XlsxError> {
    // Missing numbers stay blank cells.
    if let Some(n) = v {
        sheet.write_number(row, col, n)?;
    }
    Ok(())
}

fn write_row(sheet: &mut Worksheet, row: u32, r: &MatchRecord) -> Result<(), XlsxError> {
    sheet.write_string(row, 0, &r.date)?;
    sheet.write_string(row, 1, &r.score)?;
    sheet.write_string(row, 2, &r.clock)?;
    sheet.write_string(row, 3, &r.home_team)?;
    sheet.write_string(row, 4, &r.away_team)?;
    write_opt(sheet, row, 5, r.odds_home)?;
    write_opt(sheet, row, 6, r.odds_draw)?;
    write_opt(sheet, row, 7, r.odds_away)?;
    write_opt(sheet, row, 8, r.total_line_coefficient)?;
    write_opt(sheet, row, 9, r.total_under)?;
    write_opt(sheet, row, 10, r.total_over)?;
    sheet.write_string(row, 11, &r.league)?;
    Ok(())
}

/// Write `rows` as a single-sheet workbook with a header row.
pub fn write_xlsx(path: &Path, rows: &[MatchRecord]) -> Result<usize> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, h) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *h)?;
    }
    for (i, r) in rows.iter().enumerate() {
        write_row(sheet, i as u32 + 1, r)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(rows.len())
}
