// src/source/types.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{Record, Value};

/// One day of case and death figures for a location.
///
/// Rows with a null `continent` are the aggregate pseudo-locations in the
/// source data ("World", "Europe", "High income", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub location: String,
    pub continent: Option<String>,
    pub date: NaiveDate,
    pub population: Option<i64>,
    pub total_cases: Option<i64>,
    pub new_cases: Option<i64>,
    pub total_deaths: Option<i64>,
    pub new_deaths: Option<i64>,
}

impl CaseRecord {
    pub fn has_continent(&self) -> bool {
        self.continent.is_some()
    }
}

/// One day of vaccination figures for a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    pub location: String,
    pub date: NaiveDate,
    pub new_vaccinations: Option<i64>,
}

/// A case record matched with the vaccination record for the same
/// (location, date).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedRow<'a> {
    pub case: &'a CaseRecord,
    pub vaccination: &'a VaccinationRecord,
}

impl Record for CaseRecord {
    fn field(&self, name: &str) -> Value {
        match name {
            "location" => Value::from(self.location.as_str()),
            "continent" => Value::from(self.continent.as_deref()),
            "date" => Value::Date(self.date),
            "population" => Value::from(self.population),
            "total_cases" => Value::from(self.total_cases),
            "new_cases" => Value::from(self.new_cases),
            "total_deaths" => Value::from(self.total_deaths),
            "new_deaths" => Value::from(self.new_deaths),
            _ => Value::Null,
        }
    }
}

impl Record for VaccinationRecord {
    fn field(&self, name: &str) -> Value {
        match name {
            "location" => Value::from(self.location.as_str()),
            "date" => Value::Date(self.date),
            "new_vaccinations" => Value::from(self.new_vaccinations),
            _ => Value::Null,
        }
    }
}

impl Record for JoinedRow<'_> {
    fn field(&self, name: &str) -> Value {
        match name {
            "new_vaccinations" => Value::from(self.vaccination.new_vaccinations),
            other => self.case.field(other),
        }
    }
}
