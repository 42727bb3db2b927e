/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Cleaned text, or `None` when nothing is left.
pub fn parse_text(raw: &str) -> Option<String> {
    let s = clean_str(raw);
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Parse an integer count. Spreadsheet exports often write counts as
/// `38928341.0` or `1.4E+9`; those are accepted and truncated.
/// Anything unparsable is `None`.
pub fn parse_count(raw: &str) -> Option<i64> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_tolerate_spreadsheet_formatting() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count(" \"42\" "), Some(42));
        assert_eq!(parse_count("38928341.0"), Some(38_928_341));
        assert_eq!(parse_count("1.4E+9"), Some(1_400_000_000));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("inf"), None);
    }

    #[test]
    fn text_is_trimmed_and_empty_is_none() {
        assert_eq!(parse_text("  Africa "), Some("Africa".to_string()));
        assert_eq!(parse_text("\"\""), None);
        assert_eq!(parse_text("   "), None);
    }
}
