// src/source/bundle.rs
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{Cursor, Read},
    path::Path,
};
use tracing::debug;
use zip::ZipArchive;

use super::{
    loader::{read_deaths, read_vaccinations, DEATHS, VACCINATIONS},
    types::{CaseRecord, VaccinationRecord},
    SourceError,
};

/// Largest buffer reserved up front for one entry.
const MAX_PREALLOC: u64 = 64 << 20;

/// Capacity to reserve for an entry whose header claims `claimed` bytes.
/// The claim is untrusted, so it is capped; larger entries still grow.
fn prealloc_hint(claimed: u64) -> usize {
    claimed.min(MAX_PREALLOC) as usize
}

/// Open `zip_path`, buffer its `.csv` entries, and parse the one whose name
/// mentions "death" and the one whose name mentions "vacc".
#[tracing::instrument(level = "info", skip(zip_path), fields(path = %zip_path.as_ref().display()))]
pub fn load_bundle<P: AsRef<Path>>(
    zip_path: P,
) -> Result<(Vec<CaseRecord>, Vec<VaccinationRecord>)> {
    let bundle = zip_path.as_ref().display().to_string();

    // 1) Open the ZIP once
    let file = File::open(&zip_path)
        .with_context(|| format!("Failed to open ZIP file: {:?}", zip_path.as_ref()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("Failed to read ZIP archive: {:?}", zip_path.as_ref()))?;

    // 2) Pull the two CSV entries into memory
    let mut deaths_buf: Option<(String, Vec<u8>)> = None;
    let mut vacc_buf: Option<(String, Vec<u8>)> = None;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to access ZIP entry #{} in {}", i, bundle))?;
        let name = entry.name().to_string();
        let lower = name.to_lowercase();
        if !entry.is_file() || !lower.ends_with(".csv") {
            continue;
        }

        let slot = if lower.contains("death") && deaths_buf.is_none() {
            &mut deaths_buf
        } else if lower.contains("vacc") && vacc_buf.is_none() {
            &mut vacc_buf
        } else {
            debug!(entry = %name, "ignoring unrelated CSV entry");
            continue;
        };

        let mut buf = Vec::with_capacity(prealloc_hint(entry.size()));
        entry
            .read_to_end(&mut buf)
            .with_context(|| format!("Failed to read {} into memory", name))?;
        *slot = Some((name, buf));
    }
    drop(archive);

    // 3) Parse each buffer with the regular CSV readers
    let (deaths_name, deaths_data) = deaths_buf.ok_or_else(|| SourceError::MissingDataset {
        bundle: bundle.clone(),
        dataset: DEATHS,
    })?;
    let (vacc_name, vacc_data) = vacc_buf.ok_or_else(|| SourceError::MissingDataset {
        bundle: bundle.clone(),
        dataset: VACCINATIONS,
    })?;

    let deaths = read_deaths(Cursor::new(deaths_data), &format!("{}:{}", bundle, deaths_name))?;
    let vaccinations =
        read_vaccinations(Cursor::new(vacc_data), &format!("{}:{}", bundle, vacc_name))?;
    Ok((deaths, vaccinations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::init_test_logging;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use zip::{write::SimpleFileOptions, CompressionMethod};

    fn write_zip(entries: &[(&str, &str)]) -> Result<NamedTempFile> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            for (name, content) in entries {
                zip.start_file(*name, options)?;
                zip.write_all(content.as_bytes())?;
            }
            zip.finish()?;
        }
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(&buf)?;
        Ok(tmp)
    }

    #[test]
    fn loads_both_datasets_from_one_archive() -> Result<()> {
        init_test_logging();
        let tmp = write_zip(&[
            ("README.txt", "not data"),
            (
                "data/CovidDeaths.csv",
                "location,continent,date,population,total_cases,new_cases,total_deaths,new_deaths\n\
                 Andorra,Europe,2020-03-02,77265,1,1,0,0\n",
            ),
            (
                "data/CovidVaccinations.csv",
                "location,date,new_vaccinations\nAndorra,2020-03-02,5\n",
            ),
        ])?;

        let (deaths, vaccinations) = load_bundle(tmp.path())?;
        assert_eq!(deaths.len(), 1);
        assert_eq!(vaccinations.len(), 1);
        assert_eq!(vaccinations[0].new_vaccinations, Some(5));
        Ok(())
    }

    #[test]
    fn archive_without_vaccinations_is_missing_dataset() -> Result<()> {
        let tmp = write_zip(&[(
            "CovidDeaths.csv",
            "location,continent,date,population,total_cases,new_cases,total_deaths,new_deaths\n",
        )])?;

        let err = load_bundle(tmp.path()).unwrap_err();
        match err.downcast_ref::<SourceError>() {
            Some(SourceError::MissingDataset { dataset, .. }) => assert_eq!(*dataset, VACCINATIONS),
            other => panic!("unexpected error: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn claimed_entry_size_is_capped() {
        assert_eq!(prealloc_hint(1_024), 1_024);
        assert_eq!(prealloc_hint(u64::MAX), MAX_PREALLOC as usize);
    }
}
