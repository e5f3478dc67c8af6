use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use chrono::Month;
use regex::Regex;
use rusqlite::Connection;
use tracing::warn;

use crate::parser::project::{APPLICANT, PLANNING_AREA, PROJECT_PLANNER, STATUS};
use crate::parser::Report;

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS project (
            pk              TEXT PRIMARY KEY,
            normtitle       TEXT NOT NULL,
            title           TEXT NOT NULL,
            title_alt       TEXT COLLATE NOCASE,
            header          TEXT COLLATE NOCASE,
            description     TEXT,
            year            INTEGER NOT NULL,
            month           INTEGER NOT NULL,
            ordinal         INTEGER,
            page            INTEGER,
            planning_area   TEXT COLLATE NOCASE,
            project_planner TEXT COLLATE NOCASE,
            applicant       TEXT COLLATE NOCASE,
            status          TEXT COLLATE NOCASE,
            metadata        TEXT,
            document        TEXT NOT NULL,
            loaded_at       TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_project_normtitle ON project(normtitle);
        CREATE INDEX IF NOT EXISTS idx_project_period ON project(year, month);
        ",
    )?;
    Ok(())
}

/// Report dates come as "March 2019", "March 4, 2019" or, with stray
/// spaces, "March 20 19".
pub fn year_month(date: &str) -> Result<(i32, u32)> {
    let parts: Vec<&str> = date.split_whitespace().collect();
    let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
        bail!("empty report date");
    };
    let month: Month = first
        .trim_end_matches(',')
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown month in report date {:?}", date))?;

    let mut year = last.to_string();
    if year.len() < 4 && parts.len() >= 2 {
        year = format!("{}{}", parts[parts.len() - 2], year);
    }
    let year = year
        .parse::<i32>()
        .with_context(|| format!("unknown year in report date {:?}", date))?;
    Ok((year, month.number_from_month()))
}

pub fn normalize_title(title: &str) -> String {
    NON_WORD_RE.replace_all(title, "").to_lowercase()
}

/// Upsert key: the same title in the same month is the same row.
pub fn primary_key(year: i32, month: u32, title: &str) -> String {
    format!("{}-{}-{}", year, month, normalize_title(title))
}

/// Store every project of one report in a single transaction. Returns the
/// number of rows written. Two projects of one report that share a key would
/// overwrite each other; the first is kept and the later one skipped.
pub fn save_report(conn: &Connection, report: &Report) -> Result<usize> {
    let (year, month) = year_month(&report.date)?;
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO project
             (pk, normtitle, title, title_alt, header, description, year, month, ordinal, page,
              planning_area, project_planner, applicant, status, metadata, document)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )?;
        let mut seen = HashSet::new();
        for p in &report.projects {
            let pk = primary_key(year, month, &p.title);
            if !seen.insert(pk.clone()) {
                warn!(document = %report.document, title = %p.title, %pk, "duplicate project key in report, keeping first");
                continue;
            }
            let metadata = serde_json::to_string(&p.metadata)?;
            count += stmt
                .execute(rusqlite::params![
                    pk,
                    normalize_title(&p.title),
                    p.title,
                    p.title_alt,
                    p.header,
                    p.description,
                    year,
                    month,
                    p.ordinal,
                    p.page as i64,
                    p.meta(PLANNING_AREA),
                    p.meta(PROJECT_PLANNER),
                    p.meta(APPLICANT),
                    p.meta(STATUS),
                    metadata,
                    report.document,
                ])
                .with_context(|| format!("Failed to store {:?} from {}", p.title, report.document))?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub projects: usize,
}

pub fn month_counts(conn: &Connection) -> Result<Vec<MonthCount>> {
    let mut stmt = conn.prepare(
        "SELECT year, month, COUNT(*) FROM project GROUP BY year, month ORDER BY year, month",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(MonthCount {
                year: row.get(0)?,
                month: row.get(1)?,
                projects: row.get::<_, i64>(2)? as usize,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
