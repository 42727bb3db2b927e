pub mod config;
pub mod engine;
pub mod export;
pub mod report;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::source::{CaseRecord, VaccinationRecord};
    use chrono::NaiveDate;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    pub fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,covidreports=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// A country row with only the fields most tests care about filled in.
    pub fn case(
        location: &str,
        continent: Option<&str>,
        date: NaiveDate,
        total_cases: Option<i64>,
        total_deaths: Option<i64>,
    ) -> CaseRecord {
        CaseRecord {
            location: location.to_string(),
            continent: continent.map(str::to_string),
            date,
            population: Some(1_000),
            total_cases,
            new_cases: None,
            total_deaths,
            new_deaths: None,
        }
    }

    pub fn vacc(location: &str, date: NaiveDate, new_vaccinations: Option<i64>) -> VaccinationRecord {
        VaccinationRecord {
            location: location.to_string(),
            date,
            new_vaccinations,
        }
    }
}
