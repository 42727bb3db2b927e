// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::engine::LikePattern;
use crate::export::ExportFormat;
use crate::report::{ReportKind, ReportOptions};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "covidreports.yaml";

/// What to load, which reports to run, and where to write them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub deaths: PathBuf,
    pub vaccinations: PathBuf,
    /// ZIP holding both CSVs; used instead of the two paths when set.
    pub bundle: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub format: ExportFormat,
    /// SQL LIKE pattern for `mortality_rate` / `infection_rate`.
    pub location_like: Option<String>,
    /// Empty means every report.
    pub reports: Vec<ReportKind>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            deaths: PathBuf::from("data/CovidDeaths.csv"),
            vaccinations: PathBuf::from("data/CovidVaccinations.csv"),
            bundle: None,
            output_dir: PathBuf::from("reports"),
            format: ExportFormat::Csv,
            location_like: None,
            reports: Vec::new(),
        }
    }
}

impl ReportConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing report config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` if given, else `covidreports.yaml` if it exists, else
    /// the defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn report_kinds(&self) -> Vec<ReportKind> {
        if self.reports.is_empty() {
            ReportKind::ALL.to_vec()
        } else {
            self.reports.clone()
        }
    }

    pub fn report_options(&self) -> Result<ReportOptions> {
        let location_like = self
            .location_like
            .as_deref()
            .map(LikePattern::new)
            .transpose()?;
        Ok(ReportOptions { location_like })
    }
}
