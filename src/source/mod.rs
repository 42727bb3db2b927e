// src/source/mod.rs

pub mod bundle;
pub mod date_parser;
pub mod loader;
pub mod types;
pub mod utils;

use anyhow::Result;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub use types::{CaseRecord, JoinedRow, VaccinationRecord};

/// Load-time failures that callers may want to tell apart.
/// Everything else travels as a plain `anyhow::Error`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("{dataset} dataset is missing required column `{column}`")]
    MissingField {
        dataset: &'static str,
        column: &'static str,
    },

    #[error("bundle {bundle} has no CSV entry for the {dataset} dataset")]
    MissingDataset {
        bundle: String,
        dataset: &'static str,
    },
}

/// Read access to the two input datasets. Both iterators can be requested
/// any number of times.
pub trait RowSource {
    fn deaths(&self) -> impl Iterator<Item = &CaseRecord> + '_;
    fn vaccinations(&self) -> impl Iterator<Item = &VaccinationRecord> + '_;
}

/// An in-memory snapshot of both datasets.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    deaths: Vec<CaseRecord>,
    vaccinations: Vec<VaccinationRecord>,
}

impl Dataset {
    pub fn new(deaths: Vec<CaseRecord>, vaccinations: Vec<VaccinationRecord>) -> Self {
        Self {
            deaths,
            vaccinations,
        }
    }

    /// Load both datasets from their CSV exports.
    pub fn load(deaths_path: impl AsRef<Path>, vaccinations_path: impl AsRef<Path>) -> Result<Self> {
        let deaths = loader::load_deaths(deaths_path)?;
        let vaccinations = loader::load_vaccinations(vaccinations_path)?;
        info!(
            deaths = deaths.len(),
            vaccinations = vaccinations.len(),
            "dataset loaded"
        );
        Ok(Self::new(deaths, vaccinations))
    }

    /// Load both datasets from a single ZIP archive.
    pub fn load_bundle(zip_path: impl AsRef<Path>) -> Result<Self> {
        let (deaths, vaccinations) = bundle::load_bundle(zip_path)?;
        info!(
            deaths = deaths.len(),
            vaccinations = vaccinations.len(),
            "dataset loaded from bundle"
        );
        Ok(Self::new(deaths, vaccinations))
    }
}

impl RowSource for Dataset {
    fn deaths(&self) -> impl Iterator<Item = &CaseRecord> + '_ {
        self.deaths.iter()
    }

    fn vaccinations(&self) -> impl Iterator<Item = &VaccinationRecord> + '_ {
        self.vaccinations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{case, day, vacc};

    #[test]
    fn dataset_is_re_enumerable() {
        let ds = Dataset::new(
            vec![
                case("Chile", Some("South America"), day(2021, 1, 1), Some(1), None),
                case("Chile", Some("South America"), day(2021, 1, 2), Some(2), None),
            ],
            vec![vacc("Chile", day(2021, 1, 1), Some(10))],
        );

        assert_eq!(ds.deaths().count(), 2);
        assert_eq!(ds.deaths().count(), 2);
        assert_eq!(ds.vaccinations().count(), 1);
        assert_eq!(ds.vaccinations().count(), 1);
    }
}
