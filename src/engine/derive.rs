use chrono::Datelike;

use super::value::Value;

/// `numerator / denominator * 100`, or null when either side is null or
/// non-numeric, or the denominator is zero.
pub fn ratio(numerator: &Value, denominator: &Value) -> Value {
    match (numerator.as_f64(), denominator.as_f64()) {
        (Some(n), Some(d)) if d != 0.0 => Value::Float(n / d * 100.0),
        _ => Value::Null,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
}

/// Calendar part of a date value; null for anything else.
pub fn date_part(value: &Value, part: DatePart) -> Value {
    match (value.as_date(), part) {
        (Some(d), DatePart::Year) => Value::Int(d.year() as i64),
        (Some(d), DatePart::Month) => Value::Int(d.month() as i64),
        (None, _) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::day;

    #[test]
    fn ratio_guards_zero_and_null() {
        assert_eq!(ratio(&Value::Int(50), &Value::Int(200)), Value::Float(25.0));
        assert_eq!(ratio(&Value::Int(1), &Value::Int(5)), Value::Float(20.0));
        assert_eq!(ratio(&Value::Int(7), &Value::Int(0)), Value::Null);
        assert_eq!(ratio(&Value::Int(7), &Value::Float(0.0)), Value::Null);
        assert_eq!(ratio(&Value::Int(7), &Value::Null), Value::Null);
        assert_eq!(ratio(&Value::Null, &Value::Int(7)), Value::Null);
    }

    #[test]
    fn ratio_handles_population_scale_integers() {
        let cases = Value::Int(44_690_738);
        let population = Value::Int(1_380_004_385);
        match ratio(&cases, &population) {
            Value::Float(p) => assert!((p - 3.238_449).abs() < 1e-6, "got {}", p),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn date_parts() {
        let d = Value::Date(day(2021, 7, 14));
        assert_eq!(date_part(&d, DatePart::Year), Value::Int(2021));
        assert_eq!(date_part(&d, DatePart::Month), Value::Int(7));
        assert_eq!(date_part(&Value::Null, DatePart::Month), Value::Null);
    }
}
