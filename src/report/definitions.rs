// src/report/definitions.rs
//
// Each function is one fixed pipeline:
// filter continent-not-null -> join -> aggregate/window -> derive -> order.

use crate::engine::{
    aggregate, countries_only, date_part, join, order_by, ratio, running_sum, Aggregation,
    DatePart, LikePattern, Record, ReportRow, SortKey, Value,
};
use crate::source::{CaseRecord, RowSource};

use super::session::Session;

pub const DEATH_PERCENTAGE: &str = "DeathPercentage";
pub const PERCENT_INFECTED: &str = "PercentPopulationInfected";
pub const HIGHEST_INFECTION_COUNT: &str = "HighestInfectionCount";
pub const TOTAL_DEATH_COUNT: &str = "TotalDeathCount";
pub const ROLLING_VACCINATED: &str = "RollingPeopleVaccinated";
pub const PERCENT_VACCINATED: &str = "PercentPopulationVaccinated";
pub const MONTHLY_NEW_CASES: &str = "MonthlyNewCases";

/// Name of the session table behind `percent_vaccinated_table`.
pub const PERCENT_VACCINATED_TABLE: &str = "PercentPopulationVaccinated";

fn by_location_and_date() -> [SortKey; 2] {
    [SortKey::asc("location"), SortKey::asc("date")]
}

/// Country rows, optionally narrowed to locations matching `like`.
fn countries<'a, S: RowSource>(source: &'a S, like: Option<&LikePattern>) -> Vec<&'a CaseRecord> {
    let mut rows = countries_only(source.deaths());
    if let Some(pattern) = like {
        rows.retain(|r| pattern.matches(&r.location));
    }
    rows
}

/// Copy the named columns of `record` into a new row.
fn project<R: Record>(record: &R, columns: &[&str]) -> ReportRow {
    columns
        .iter()
        .fold(ReportRow::new(), |row, c| row.with(*c, record.field(c)))
}

pub fn overview<S: RowSource>(source: &S) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = countries(source, None)
        .into_iter()
        .map(|c| {
            project(
                c,
                &[
                    "location",
                    "date",
                    "total_cases",
                    "new_cases",
                    "total_deaths",
                    "population",
                ],
            )
        })
        .collect();
    order_by(&mut rows, &by_location_and_date());
    rows
}

/// Total cases vs total deaths: likelihood of dying once infected.
pub fn mortality_rate<S: RowSource>(source: &S, like: Option<&LikePattern>) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = countries(source, like)
        .into_iter()
        .map(|c| {
            let pct = ratio(&c.field("total_deaths"), &c.field("total_cases"));
            project(c, &["location", "date", "total_cases", "total_deaths"])
                .with(DEATH_PERCENTAGE, pct)
        })
        .collect();
    order_by(&mut rows, &by_location_and_date());
    rows
}

/// Total cases vs population: share of the population infected.
pub fn infection_rate<S: RowSource>(source: &S, like: Option<&LikePattern>) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = countries(source, like)
        .into_iter()
        .map(|c| {
            let pct = ratio(&c.field("total_cases"), &c.field("population"));
            project(c, &["location", "date", "population", "total_cases"])
                .with(PERCENT_INFECTED, pct)
        })
        .collect();
    order_by(&mut rows, &by_location_and_date());
    rows
}

/// Countries ranked by their peak infection rate.
pub fn highest_infection<S: RowSource>(source: &S) -> Vec<ReportRow> {
    let per_day: Vec<ReportRow> = countries(source, None)
        .into_iter()
        .map(|c| {
            let pct = ratio(&c.field("total_cases"), &c.field("population"));
            project(c, &["location", "population", "total_cases"]).with(PERCENT_INFECTED, pct)
        })
        .collect();

    let mut rows = aggregate(
        &per_day,
        &["location", "population"],
        &[
            Aggregation::max(HIGHEST_INFECTION_COUNT, "total_cases"),
            Aggregation::max(PERCENT_INFECTED, PERCENT_INFECTED),
        ],
    );
    order_by(
        &mut rows,
        &[SortKey::desc(PERCENT_INFECTED), SortKey::asc("location")],
    );
    rows
}

/// Countries ranked by their death count.
pub fn highest_deaths<S: RowSource>(source: &S) -> Vec<ReportRow> {
    let mut rows = aggregate(
        &countries(source, None),
        &["location"],
        &[Aggregation::max(TOTAL_DEATH_COUNT, "total_deaths")],
    );
    order_by(
        &mut rows,
        &[SortKey::desc(TOTAL_DEATH_COUNT), SortKey::asc("location")],
    );
    rows
}

/// Continents ranked by the highest death count of any of their countries.
pub fn continent_deaths<S: RowSource>(source: &S) -> Vec<ReportRow> {
    let mut rows = aggregate(
        &countries(source, None),
        &["continent"],
        &[Aggregation::max(TOTAL_DEATH_COUNT, "total_deaths")],
    );
    order_by(
        &mut rows,
        &[SortKey::desc(TOTAL_DEATH_COUNT), SortKey::asc("continent")],
    );
    rows
}

fn global_totals(rows: &[&CaseRecord], group_keys: &[&str]) -> Vec<ReportRow> {
    let mut out = aggregate(
        rows,
        group_keys,
        &[
            Aggregation::sum("total_cases", "new_cases"),
            Aggregation::sum("total_deaths", "new_deaths"),
        ],
    );
    for row in &mut out {
        let pct = ratio(&row.field("total_deaths"), &row.field("total_cases"));
        row.set(DEATH_PERCENTAGE, pct);
    }
    out
}

/// World totals summed from the daily country figures.
pub fn global_summary<S: RowSource>(source: &S) -> Vec<ReportRow> {
    global_totals(&countries(source, None), &[])
}

/// World totals per day.
pub fn global_daily<S: RowSource>(source: &S) -> Vec<ReportRow> {
    let mut rows = global_totals(&countries(source, None), &["date"]);
    order_by(&mut rows, &[SortKey::asc("date")]);
    rows
}

/// Population vs vaccinations with a per-country running total.
pub fn rolling_vaccinations<S: RowSource>(source: &S) -> Vec<ReportRow> {
    let joined = join(
        source.deaths().filter(|c| c.has_continent()),
        source.vaccinations(),
    );

    let mut rows: Vec<ReportRow> = running_sum(&joined, "location", "date", "new_vaccinations")
        .into_iter()
        .map(|t| {
            project(
                &joined[t.row],
                &[
                    "continent",
                    "location",
                    "date",
                    "population",
                    "new_vaccinations",
                ],
            )
            .with(ROLLING_VACCINATED, t.cumulative)
        })
        .collect();
    order_by(&mut rows, &by_location_and_date());
    rows
}

/// The running total as a share of the population.
pub fn percent_vaccinated<S: RowSource>(source: &S) -> Vec<ReportRow> {
    let mut rows = rolling_vaccinations(source);
    for row in &mut rows {
        let pct = ratio(&row.field(ROLLING_VACCINATED), &row.field("population"));
        row.set(PERCENT_VACCINATED, pct);
    }
    rows
}

/// Same rows as [`percent_vaccinated`], stored in `session` first and then
/// served from the stored table.
pub fn percent_vaccinated_table<S: RowSource>(source: &S, session: &Session) -> Vec<ReportRow> {
    let table = session.materialize(PERCENT_VACCINATED_TABLE, percent_vaccinated(source));
    table.rows.clone()
}

/// New cases summed per country and calendar month.
pub fn monthly_new_cases<S: RowSource>(source: &S) -> Vec<ReportRow> {
    let per_day: Vec<ReportRow> = countries(source, None)
        .into_iter()
        .map(|c| {
            let date = Value::Date(c.date);
            ReportRow::new()
                .with("location", c.location.as_str())
                .with("year", date_part(&date, DatePart::Year))
                .with("month", date_part(&date, DatePart::Month))
                .with("new_cases", c.new_cases)
        })
        .collect();

    let mut rows = aggregate(
        &per_day,
        &["location", "year", "month"],
        &[Aggregation::sum(MONTHLY_NEW_CASES, "new_cases")],
    );
    order_by(
        &mut rows,
        &[
            SortKey::asc("location"),
            SortKey::asc("year"),
            SortKey::asc("month"),
        ],
    );
    rows
}
