// src/engine/join.rs
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use crate::source::{CaseRecord, JoinedRow, VaccinationRecord};

/// Inner join of case records with vaccination records on (location, date).
///
/// Output follows the order of `deaths`. Rows without a partner on the
/// other side are dropped. Should a key repeat on the vaccination side,
/// each match produces its own row, in vaccination order.
pub fn join<'a, D, V>(deaths: D, vaccinations: V) -> Vec<JoinedRow<'a>>
where
    D: IntoIterator<Item = &'a CaseRecord>,
    V: IntoIterator<Item = &'a VaccinationRecord>,
{
    let mut index: HashMap<(&'a str, NaiveDate), Vec<&'a VaccinationRecord>> = HashMap::new();
    for v in vaccinations {
        index
            .entry((v.location.as_str(), v.date))
            .or_default()
            .push(v);
    }

    let mut out = Vec::new();
    for case in deaths {
        if let Some(matches) = index.get(&(case.location.as_str(), case.date)) {
            out.extend(matches.iter().map(|vaccination| JoinedRow {
                case,
                vaccination: *vaccination,
            }));
        }
    }

    debug!(keys = index.len(), joined = out.len(), "joined deaths with vaccinations");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Record, Value};
    use crate::test_support::{case, day, vacc};

    #[test]
    fn drops_unmatched_rows_on_both_sides() {
        let deaths = vec![
            case("Chile", Some("South America"), day(2021, 1, 1), Some(1), None),
            case("Chile", Some("South America"), day(2021, 1, 2), Some(2), None),
            case("Peru", Some("South America"), day(2021, 1, 1), Some(3), None),
        ];
        let vaccinations = vec![
            vacc("Chile", day(2021, 1, 2), Some(7)),
            vacc("Peru", day(2021, 1, 5), Some(9)),
        ];

        let joined = join(&deaths, &vaccinations);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].field("location"), Value::from("Chile"));
        assert_eq!(joined[0].field("total_cases"), Value::Int(2));
        assert_eq!(joined[0].field("new_vaccinations"), Value::Int(7));
    }

    #[test]
    fn one_row_per_key_and_deaths_order_kept() {
        let deaths = vec![
            case("B", Some("Europe"), day(2021, 1, 1), None, None),
            case("A", Some("Europe"), day(2021, 1, 1), None, None),
        ];
        let vaccinations = vec![
            vacc("A", day(2021, 1, 1), Some(1)),
            vacc("B", day(2021, 1, 1), Some(2)),
        ];

        let joined = join(&deaths, &vaccinations);
        let locs: Vec<_> = joined.iter().map(|r| r.case.location.as_str()).collect();
        assert_eq!(locs, vec!["B", "A"]);
    }

    #[test]
    fn repeated_vaccination_key_yields_a_row_per_match() {
        let deaths = vec![
            case("A", Some("Europe"), day(2021, 1, 1), Some(10), None),
            case("B", Some("Europe"), day(2021, 1, 1), Some(20), None),
        ];
        let vaccinations = vec![
            vacc("B", day(2021, 1, 1), Some(5)),
            vacc("A", day(2021, 1, 1), Some(3)),
            vacc("A", day(2021, 1, 1), Some(4)),
        ];

        let joined = join(&deaths, &vaccinations);
        let pairs: Vec<_> = joined
            .iter()
            .map(|r| (r.case.location.as_str(), r.field("new_vaccinations")))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("A", Value::Int(3)),
                ("A", Value::Int(4)),
                ("B", Value::Int(5)),
            ]
        );
    }

    #[test]
    fn empty_side_gives_empty_join() {
        let deaths = vec![case("A", Some("Europe"), day(2021, 1, 1), None, None)];
        let vaccinations: Vec<VaccinationRecord> = Vec::new();
        assert!(join(&deaths, &vaccinations).is_empty());
    }
}
