use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use serde::Deserialize;
use thiserror::Error;

use super::model::{CutoffTable, SeatRecord};

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Google Drive export of the consolidated cutoff sheet (shared read-only).
const CUTOFF_SHEET_URL: &str = "https://drive.google.com/uc?id=1W5bEfzU9Z42if5PeNjQG6DFie9ryOOvS";

/// Local copy written next to the working directory before parsing.
const CUTOFF_CACHE_FILE: &str = "jee_cutoff_data.xlsx";

/// A failed load. Either outcome is fatal for the process lifetime: the
/// result is memoized and no retry happens.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("cutoff data could not be downloaded: {0}")]
    DataUnavailable(String),
    #[error("cutoff data could not be read: {0}")]
    DataFormat(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

static CUTOFFS: OnceLock<Result<CutoffTable, LoadError>> = OnceLock::new();

/// Download and parse the cutoff sheet, once per process.
///
/// The first caller pays for the fetch+parse; everyone after that (and anyone
/// racing the first caller) shares the same memoized table handle. Failures
/// are memoized too.
pub fn load() -> Result<&'static CutoffTable, LoadError> {
    CUTOFFS
        .get_or_init(|| {
            let path = fetch_cutoff_sheet()
                .map_err(|e| LoadError::DataUnavailable(format!("{e:#}")))?;
            let table =
                parse_file(&path).map_err(|e| LoadError::DataFormat(format!("{e:#}")))?;
            log::info!("Loaded {} seats from {}", table.len(), path.display());
            Ok(table)
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// GET the fixed export URL and write the body to the local cache file.
fn fetch_cutoff_sheet() -> Result<PathBuf> {
    let response = reqwest::blocking::get(CUTOFF_SHEET_URL).context("requesting cutoff sheet")?;
    if !response.status().is_success() {
        bail!("server answered {}", response.status());
    }
    let bytes = response.bytes().context("reading response body")?;

    let path = PathBuf::from(CUTOFF_CACHE_FILE);
    fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Downloaded cutoff sheet ({} bytes)", bytes.len());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a cutoff sheet.  Dispatch by extension.
///
/// Supported renditions:
/// * `.xlsx` / `.xls` – the published workbook; first sheet, one header row
/// * `.csv`  – same columns, comma separated
/// * `.json` – records-oriented array of row objects
pub fn parse_file(path: &Path) -> Result<CutoffTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xls" => parse_workbook(path),
        "csv" => parse_csv(path),
        "json" => parse_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Positions of the required columns in a header row.
struct Columns {
    institute: usize,
    branch: usize,
    quota: usize,
    category: usize,
    gender: usize,
    closing_rank: usize,
}

impl Columns {
    /// Match headers case- and whitespace-insensitively, so
    /// "Closing Rank" and "ClosingRank" both resolve.
    fn locate(headers: &[String]) -> Result<Columns> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| normalize_header(h) == name)
                .with_context(|| format!("sheet is missing a '{name}' column"))
        };
        Ok(Columns {
            institute: find("institute")?,
            branch: find("branch")?,
            quota: find("quota")?,
            category: find("category")?,
            gender: find("gender")?,
            closing_rank: find("closingrank")?,
        })
    }
}

fn normalize_header(s: &str) -> String {
    s.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

/// Assemble one row, fixing the canonical case per field. `None` drops the
/// row: an empty required cell or no usable closing rank.
fn build_seat(
    institute: &str,
    branch: &str,
    quota: &str,
    category: &str,
    gender: &str,
    closing_rank: Option<u32>,
) -> Option<SeatRecord> {
    let institute = institute.trim();
    let branch = branch.trim();
    let quota = quota.trim();
    let category = category.trim();
    let gender = gender.trim();

    if institute.is_empty()
        || branch.is_empty()
        || quota.is_empty()
        || category.is_empty()
        || gender.is_empty()
    {
        return None;
    }

    Some(SeatRecord {
        institute: institute.to_string(),
        branch: branch.to_string(),
        quota: quota.to_ascii_uppercase(),
        category: category.to_ascii_uppercase(),
        gender: gender.to_lowercase(),
        closing_rank: closing_rank?,
    })
}

fn finish_table(seats: Vec<SeatRecord>, skipped: usize) -> CutoffTable {
    if skipped > 0 {
        log::warn!("Skipped {skipped} rows with empty cells or no usable closing rank");
    }
    CutoffTable::from_seats(seats)
}

/// Positive integer out of free text; anything else is unusable.
fn parse_rank(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|r| *r > 0)
}

// ---------------------------------------------------------------------------
// Workbook (calamine)
// ---------------------------------------------------------------------------

fn parse_workbook(path: &Path) -> Result<CutoffTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no sheets")?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading sheet '{sheet}'"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .context("sheet has no header row")?
        .iter()
        .map(cell_to_string)
        .collect();
    let columns = Columns::locate(&headers)?;

    let mut seats = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let cell = |i: usize| row.get(i).map(cell_to_string).unwrap_or_default();
        let rank = row.get(columns.closing_rank).and_then(cell_to_rank);
        match build_seat(
            &cell(columns.institute),
            &cell(columns.branch),
            &cell(columns.quota),
            &cell(columns.category),
            &cell(columns.gender),
            rank,
        ) {
            Some(seat) => seats.push(seat),
            None => skipped += 1,
        }
    }

    Ok(finish_table(seats, skipped))
}

/// Render a cell as text; integral floats lose the trailing `.0` so codes
/// stored as numbers come back clean.
fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{f}")
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty | Data::Error(_) => String::new(),
        Data::DateTime(d) => d.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Closing rank from a cell: positive integer, else `None`.
fn cell_to_rank(c: &Data) -> Option<u32> {
    match c {
        Data::Int(i) if *i > 0 => u32::try_from(*i).ok(),
        Data::Float(f) if *f > 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64 => {
            Some(*f as u32)
        }
        Data::String(s) => parse_rank(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn parse_csv(path: &Path) -> Result<CutoffTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let columns = Columns::locate(&headers)?;

    let mut seats = Vec::new();
    let mut skipped = 0usize;
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |i: usize| record.get(i).unwrap_or("");
        match build_seat(
            cell(columns.institute),
            cell(columns.branch),
            cell(columns.quota),
            cell(columns.category),
            cell(columns.gender),
            parse_rank(cell(columns.closing_rank)),
        ) {
            Some(seat) => seats.push(seat),
            None => skipped += 1,
        }
    }

    Ok(finish_table(seats, skipped))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Institute": "NIT Trichy",
///     "Branch": "CSE",
///     "Quota": "HS",
///     "Category": "OPEN",
///     "Gender": "Gender-Neutral",
///     "ClosingRank": 1250
///   },
///   ...
/// ]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSeat {
    #[serde(rename = "Institute")]
    institute: String,
    #[serde(rename = "Branch")]
    branch: String,
    #[serde(rename = "Quota")]
    quota: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "ClosingRank")]
    closing_rank: serde_json::Value,
}

fn parse_json(path: &Path) -> Result<CutoffTable> {
    let text = fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<RawSeat> = serde_json::from_str(&text).context("parsing JSON")?;

    let mut seats = Vec::new();
    let mut skipped = 0usize;
    for raw in &records {
        match build_seat(
            &raw.institute,
            &raw.branch,
            &raw.quota,
            &raw.category,
            &raw.gender,
            json_rank(&raw.closing_rank),
        ) {
            Some(seat) => seats.push(seat),
            None => skipped += 1,
        }
    }

    Ok(finish_table(seats, skipped))
}

fn json_rank(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => match n.as_u64() {
            Some(v) => u32::try_from(v).ok().filter(|r| *r > 0),
            // pandas serializes integral columns as floats when NaNs are around
            None => n
                .as_f64()
                .filter(|f| *f > 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
                .map(|f| f as u32),
        },
        serde_json::Value::String(s) => parse_rank(s),
        _ => None,
    }
}
