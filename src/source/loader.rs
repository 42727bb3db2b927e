// src/source/loader.rs
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::{borrow::Cow, fs::File, io::Read, path::Path};
use tracing::{debug, warn};

use super::{
    date_parser::parse_date,
    types::{CaseRecord, VaccinationRecord},
    utils::{parse_count, parse_text},
    SourceError,
};

pub const DEATHS: &str = "deaths";
pub const VACCINATIONS: &str = "vaccinations";

const DEATH_COLUMNS: [&str; 8] = [
    "location",
    "continent",
    "date",
    "population",
    "total_cases",
    "new_cases",
    "total_deaths",
    "new_deaths",
];
const VACCINATION_COLUMNS: [&str; 3] = ["location", "date", "new_vaccinations"];

/// Map each required column to its position in the header row.
/// Names match case-insensitively; extra columns are ignored.
fn resolve_columns<const N: usize>(
    headers: &ByteRecord,
    dataset: &'static str,
    required: [&'static str; N],
) -> Result<[usize; N], SourceError> {
    let names: Vec<String> = headers
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_ascii_lowercase()
        })
        .collect();

    let mut out = [0usize; N];
    for (slot, column) in out.iter_mut().zip(required) {
        *slot = names
            .iter()
            .position(|n| n == column)
            .ok_or(SourceError::MissingField { dataset, column })?;
    }
    Ok(out)
}

/// Field `idx` as text. Bytes that are not UTF-8 (Windows-1252 exports)
/// become U+FFFD instead of failing the row.
fn text_at(record: &ByteRecord, idx: usize) -> Option<Cow<'_, str>> {
    record.get(idx).map(String::from_utf8_lossy)
}

/// Location and date of a row, or `None` when either is unusable.
fn row_key(record: &ByteRecord, location: usize, date: usize) -> Option<(String, NaiveDate)> {
    let loc = parse_text(&text_at(record, location)?)?;
    let day = parse_date(&text_at(record, date)?)?;
    Some((loc, day))
}

fn count_at(record: &ByteRecord, idx: usize) -> Option<i64> {
    text_at(record, idx).and_then(|s| parse_count(&s))
}

/// Parse the case/death CSV from any reader. `origin` only labels errors.
pub fn read_deaths<R: Read>(reader: R, origin: &str) -> Result<Vec<CaseRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr
        .byte_headers()
        .with_context(|| format!("reading header row of {}", origin))?
        .clone();
    let [loc, continent, date_col, population, total_cases, new_cases, total_deaths, new_deaths] =
        resolve_columns(&headers, DEATHS, DEATH_COLUMNS)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in rdr.byte_records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error in {} at record {}", origin, idx))?;

        let Some((location, date)) = row_key(&record, loc, date_col) else {
            skipped += 1;
            continue;
        };
        rows.push(CaseRecord {
            location,
            continent: text_at(&record, continent).and_then(|s| parse_text(&s)),
            date,
            population: count_at(&record, population),
            total_cases: count_at(&record, total_cases),
            new_cases: count_at(&record, new_cases),
            total_deaths: count_at(&record, total_deaths),
            new_deaths: count_at(&record, new_deaths),
        });
    }

    if skipped > 0 {
        warn!(origin, skipped, "skipped rows without a usable location/date");
    }
    debug!(origin, rows = rows.len(), "parsed deaths");
    Ok(rows)
}

/// Parse the vaccination CSV from any reader. `origin` only labels errors.
pub fn read_vaccinations<R: Read>(reader: R, origin: &str) -> Result<Vec<VaccinationRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr
        .byte_headers()
        .with_context(|| format!("reading header row of {}", origin))?
        .clone();
    let [loc, date_col, new_vaccinations] =
        resolve_columns(&headers, VACCINATIONS, VACCINATION_COLUMNS)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in rdr.byte_records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error in {} at record {}", origin, idx))?;

        let Some((location, date)) = row_key(&record, loc, date_col) else {
            skipped += 1;
            continue;
        };
        rows.push(VaccinationRecord {
            location,
            date,
            new_vaccinations: count_at(&record, new_vaccinations),
        });
    }

    if skipped > 0 {
        warn!(origin, skipped, "skipped rows without a usable location/date");
    }
    debug!(origin, rows = rows.len(), "parsed vaccinations");
    Ok(rows)
}

#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_deaths<P: AsRef<Path>>(path: P) -> Result<Vec<CaseRecord>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open deaths CSV: {:?}", path.as_ref()))?;
    read_deaths(file, &path.as_ref().display().to_string())
}

#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_vaccinations<P: AsRef<Path>>(path: P) -> Result<Vec<VaccinationRecord>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open vaccinations CSV: {:?}", path.as_ref()))?;
    read_vaccinations(file, &path.as_ref().display().to_string())
}
