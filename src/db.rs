use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use serde::Serialize;

pub const DEFAULT_DB_PATH: &str = "data/live.sqlite";

/// Placeholder for a missing textual field.
pub const SENTINEL: &str = "-";

const COLUMNS: &str = "date, score, clock, home_team, away_team, odds_home, odds_draw, odds_away, \
                       total_line_coefficient, total_under, total_over, league";

/// One live match as scraped from a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub date: String,
    pub score: String,
    pub clock: String,
    pub home_team: String,
    pub away_team: String,
    pub odds_home: Option<f64>,
    pub odds_draw: Option<f64>,
    pub odds_away: Option<f64>,
    pub total_line_coefficient: Option<f64>,
    pub total_under: Option<f64>,
    pub total_over: Option<f64>,
    pub league: String,
}

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Open an existing store without creating it. `None` when the file is absent.
pub fn open_existing(path: &Path) -> Result<Option<Connection>> {
    if !path.exists() {
        return Ok(None);
    }
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open {:?}", path))?;
    Ok(Some(conn))
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    // No primary key: rows are unique only by full-row equality, order is rowid.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS live_matches (
            date                   TEXT NOT NULL,
            score                  TEXT NOT NULL,
            clock                  TEXT NOT NULL,
            home_team              TEXT NOT NULL,
            away_team              TEXT NOT NULL,
            odds_home              REAL,
            odds_draw              REAL,
            odds_away              REAL,
            total_line_coefficient REAL,
            total_under            REAL,
            total_over             REAL,
            league                 TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

fn has_table(conn: &Connection) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'live_matches'",
        [],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
    Ok(MatchRecord {
        date: row.get(0)?,
        score: row.get(1)?,
        clock: row.get(2)?,
        home_team: row.get(3)?,
        away_team: row.get(4)?,
        odds_home: row.get(5)?,
        odds_draw: row.get(6)?,
        odds_away: row.get(7)?,
        total_line_coefficient: row.get(8)?,
        total_under: row.get(9)?,
        total_over: row.get(10)?,
        league: row.get(11)?,
    })
}

// ── Store lifecycle ──

/// Load every stored row in insertion order. A missing file is an empty store.
pub fn load_all(path: &Path) -> Result<Vec<MatchRecord>> {
    let Some(conn) = open_existing(path)? else {
        return Ok(Vec::new());
    };
    if !has_table(&conn)? {
        return Ok(Vec::new());
    }
    let sql = format!("SELECT {} FROM live_matches ORDER BY rowid", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], row_to_record)?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read stored matches from {:?}", path))?;
    Ok(rows)
}

/// Overwrite the store with `rows`. Runs in one transaction, so a failure
/// leaves the previous contents in place.
pub fn replace_all(path: &Path, rows: &[MatchRecord]) -> Result<usize> {
    let conn = connect(path)?;
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM live_matches", [])?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO live_matches ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            COLUMNS
        ))?;
        for r in rows {
            stmt.execute(rusqlite::params![
                r.date, r.score, r.clock, r.home_team, r.away_team,
                r.odds_home, r.odds_draw, r.odds_away,
                r.total_line_coefficient, r.total_under, r.total_over, r.league,
            ])?;
        }
    }
    tx.commit()
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(rows.len())
}

// ── Reporting ──

pub fn fetch_overview(
    conn: &Connection,
    league: Option<&str>,
    limit: usize,
) -> Result<Vec<MatchRecord>> {
    if !has_table(conn)? {
        return Ok(Vec::new());
    }
    let mut sql = format!("SELECT {} FROM live_matches", COLUMNS);
    if league.is_some() {
        sql.push_str(" WHERE league LIKE ?1");
    }
    sql.push_str(&format!(" ORDER BY rowid DESC LIMIT {}", limit));

    let mut stmt = conn.prepare(&sql)?;
    let rows = match league {
        Some(l) => stmt
            .query_map([format!("%{}%", l)], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?,
        None => stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

pub struct StoreStats {
    pub rows: i64,
    pub leagues: i64,
    pub dates: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn get_stats(conn: &Connection) -> Result<StoreStats> {
    if !has_table(conn)? {
        return Ok(StoreStats {
            rows: 0,
            leagues: 0,
            dates: 0,
            first_date: None,
            last_date: None,
        });
    }
    let (rows, leagues, dates): (i64, i64, i64) = conn.query_row(
        "SELECT COUNT(*), COUNT(DISTINCT league), COUNT(DISTINCT date) FROM live_matches",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    // Dates are stored dd/mm/YYYY, so insertion order is the meaningful one.
    let first_date = conn
        .query_row("SELECT date FROM live_matches ORDER BY rowid LIMIT 1", [], |row| {
            row.get::<_, String>(0)
        })
        .optional()?;
    let last_date = conn
        .query_row("SELECT date FROM live_matches ORDER BY rowid DESC LIMIT 1", [], |row| {
            row.get::<_, String>(0)
        })
        .optional()?;
    Ok(StoreStats {
        rows,
        leagues,
        dates,
        first_date,
        last_date,
    })
}

#[cfg(test)]
pub(crate) fn sample(home: &str, away: &str, clock: &str) -> MatchRecord {
    MatchRecord {
        date: "19/10/2026".to_string(),
        score: "1:0".to_string(),
        clock: clock.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        odds_home: Some(1.85),
        odds_draw: Some(3.4),
        odds_away: None,
        total_line_coefficient: Some(1.9),
        total_under: Some(2.5),
        total_over: Some(3.5),
        league: "Football. England. Premier League".to_string(),
    }
}
