//! Raw rows → visualized portrait records.
//!
//! Dates in the source dataset are free text ("c. 1790", "1780s", "early 19th century", ...).
//! Rows whose date yields no year, or a year outside the configured range, are dropped without
//! an error.

use crate::config::ChartConfig;
use crate::portrait::{Gender, PortraitRecord, RawPortraitRow};
use crate::{Error, Result};
use regex::Regex;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

const EARLY_19TH_CENTURY_YEAR: i32 = 1805;
const LATE_18TH_CENTURY_YEAR: i32 = 1785;

// Word boundaries and digits are ASCII-only: "1790年" and "1790é" still carry a year.
fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?-u:\b)(1[6-9][0-9]{2}|20[0-9]{2})(?-u:\b)").expect("year regex")
    })
}

fn decade_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?-u:\b)(1[6-9][0-9])0s(?-u:\b)").expect("decade regex"))
}

/// Extracts a year from a free-text date.
///
/// Rules, first match wins:
/// 1. a `16xx`..`20xx` token
/// 2. a decade such as `1780s`, read as the decade start plus five (`1785`)
/// 3. `early 19th century` → 1805
/// 4. `late 18th century` → 1785
pub fn parse_year(date: &str) -> Option<i32> {
    if date.is_empty() {
        return None;
    }
    if let Some(caps) = year_re().captures(date) {
        return caps[1].parse().ok();
    }
    if let Some(caps) = decade_re().captures(date) {
        let prefix: i32 = caps[1].parse().ok()?;
        return Some(prefix * 10 + 5);
    }
    if date.contains("early 19th century") {
        return Some(EARLY_19TH_CENTURY_YEAR);
    }
    if date.contains("late 18th century") {
        return Some(LATE_18TH_CENTURY_YEAR);
    }
    None
}

fn or_default(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Converts one raw row. The year may be `None`; filtering happens in [`normalize_rows`].
pub fn normalize_row(row: RawPortraitRow) -> PortraitRecord {
    let thumbnail_low_res_url = if row.thumbnail_low_res.is_empty() {
        row.thumbnail.clone()
    } else {
        row.thumbnail_low_res
    };
    PortraitRecord {
        year: parse_year(&row.date),
        title: row.title,
        artist: row.artist,
        sitter: row.sitter,
        size: or_default(row.size, "Unknown"),
        gender: Gender::from_cell(&row.sitter_gender),
        thumbnail_url: row.thumbnail,
        thumbnail_low_res_url,
    }
}

/// Normalizes rows and keeps those whose year falls inside the configured range.
pub fn normalize_rows(
    rows: impl IntoIterator<Item = RawPortraitRow>,
    config: &ChartConfig,
) -> Vec<PortraitRecord> {
    let range = config.year_range();
    let mut dropped = 0usize;
    let records: Vec<PortraitRecord> = rows
        .into_iter()
        .map(normalize_row)
        .filter(|r| {
            let keep = r.year.is_some_and(|y| range.contains(&y));
            if !keep {
                dropped += 1;
            }
            keep
        })
        .collect();

    tracing::debug!(
        dropped,
        min_year = config.min_year,
        max_year = config.max_year,
        "dropped rows without a usable year"
    );
    tracing::info!(portraits = records.len(), "processed portrait records");
    records
}

/// Reads CSV text (header row required) and normalizes it.
pub fn load_portraits_from_reader<R: Read>(
    reader: R,
    config: &ChartConfig,
) -> Result<Vec<PortraitRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let mut rows = Vec::new();
    for row in csv_reader.deserialize::<RawPortraitRow>() {
        rows.push(row?);
    }
    tracing::debug!(rows = rows.len(), "loaded portrait rows");
    Ok(normalize_rows(rows, config))
}

/// Startup load of the dataset.
///
/// The work is synchronous file I/O plus CPU-bound parsing; it is exposed as `async` so hosts can
/// await it from any executor. A failure here is fatal to the visualization: the caller gets
/// [`Error::DataLoad`] and no partial dataset.
pub async fn load_portraits(
    path: impl AsRef<Path>,
    config: &ChartConfig,
) -> Result<Vec<PortraitRecord>> {
    load_portraits_sync(path, config)
}

/// Synchronous variant of [`load_portraits`].
pub fn load_portraits_sync(
    path: impl AsRef<Path>,
    config: &ChartConfig,
) -> Result<Vec<PortraitRecord>> {
    let path = path.as_ref();
    let to_load_error = |message: String| Error::DataLoad {
        path: path.display().to_string(),
        message,
    };
    let file = std::fs::File::open(path).map_err(|err| to_load_error(err.to_string()))?;
    load_portraits_from_reader(std::io::BufReader::new(file), config)
        .map_err(|err| to_load_error(err.to_string()))
}
