// src/report/mod.rs

pub mod definitions;
pub mod session;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, time::Instant};
use tracing::info;

use crate::engine::{LikePattern, ReportRow};
use crate::source::RowSource;

pub use session::{MaterializedTable, Session};

/// The report set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Overview,
    MortalityRate,
    InfectionRate,
    HighestInfection,
    HighestDeaths,
    ContinentDeaths,
    GlobalSummary,
    GlobalDaily,
    RollingVaccinations,
    PercentVaccinated,
    PercentVaccinatedTable,
    MonthlyNewCases,
}

impl ReportKind {
    pub const ALL: [ReportKind; 12] = [
        ReportKind::Overview,
        ReportKind::MortalityRate,
        ReportKind::InfectionRate,
        ReportKind::HighestInfection,
        ReportKind::HighestDeaths,
        ReportKind::ContinentDeaths,
        ReportKind::GlobalSummary,
        ReportKind::GlobalDaily,
        ReportKind::RollingVaccinations,
        ReportKind::PercentVaccinated,
        ReportKind::PercentVaccinatedTable,
        ReportKind::MonthlyNewCases,
    ];

    /// Stable snake_case name, also used as the export file stem.
    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Overview => "overview",
            ReportKind::MortalityRate => "mortality_rate",
            ReportKind::InfectionRate => "infection_rate",
            ReportKind::HighestInfection => "highest_infection",
            ReportKind::HighestDeaths => "highest_deaths",
            ReportKind::ContinentDeaths => "continent_deaths",
            ReportKind::GlobalSummary => "global_summary",
            ReportKind::GlobalDaily => "global_daily",
            ReportKind::RollingVaccinations => "rolling_vaccinations",
            ReportKind::PercentVaccinated => "percent_vaccinated",
            ReportKind::PercentVaccinatedTable => "percent_vaccinated_table",
            ReportKind::MonthlyNewCases => "monthly_new_cases",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Knobs shared by all reports of a run.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Narrows `mortality_rate` and `infection_rate` to matching locations.
    pub location_like: Option<LikePattern>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub kind: ReportKind,
    pub rows: Vec<ReportRow>,
}

/// Compute one report. Never fails: no matching input gives no rows.
#[tracing::instrument(level = "info", skip(source, options, session), fields(report = %kind))]
pub fn run_report<S: RowSource>(
    kind: ReportKind,
    source: &S,
    options: &ReportOptions,
    session: &Session,
) -> Report {
    let start = Instant::now();
    let like = options.location_like.as_ref();
    let rows = match kind {
        ReportKind::Overview => definitions::overview(source),
        ReportKind::MortalityRate => definitions::mortality_rate(source, like),
        ReportKind::InfectionRate => definitions::infection_rate(source, like),
        ReportKind::HighestInfection => definitions::highest_infection(source),
        ReportKind::HighestDeaths => definitions::highest_deaths(source),
        ReportKind::ContinentDeaths => definitions::continent_deaths(source),
        ReportKind::GlobalSummary => definitions::global_summary(source),
        ReportKind::GlobalDaily => definitions::global_daily(source),
        ReportKind::RollingVaccinations => definitions::rolling_vaccinations(source),
        ReportKind::PercentVaccinated => definitions::percent_vaccinated(source),
        ReportKind::PercentVaccinatedTable => {
            definitions::percent_vaccinated_table(source, session)
        }
        ReportKind::MonthlyNewCases => definitions::monthly_new_cases(source),
    };
    info!(rows = rows.len(), elapsed = ?start.elapsed(), "report computed");
    Report { kind, rows }
}

/// Compute several reports in parallel. Results come back in the order of
/// `kinds`.
pub fn run_reports<S: RowSource + Sync>(
    kinds: &[ReportKind],
    source: &S,
    options: &ReportOptions,
    session: &Session,
) -> Vec<Report> {
    kinds
        .par_iter()
        .map(|kind| run_report(*kind, source, options, session))
        .collect()
}
