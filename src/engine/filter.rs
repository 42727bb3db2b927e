// src/engine/filter.rs
use anyhow::{Context, Result};
use regex::Regex;

use crate::source::CaseRecord;

/// A SQL `LIKE` pattern: `%` matches any run of characters, `_` exactly
/// one. Matching ignores case, like the default SQL Server collation.
#[derive(Debug, Clone)]
pub struct LikePattern {
    source: String,
    regex: Regex,
}

impl LikePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut re = String::with_capacity(pattern.len() + 8);
        re.push_str("(?is)^");
        for ch in pattern.chars() {
            match ch {
                '%' => re.push_str(".*"),
                '_' => re.push('.'),
                c => re.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
            }
        }
        re.push('$');
        let regex =
            Regex::new(&re).with_context(|| format!("compiling LIKE pattern {:?}", pattern))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// `WHERE continent IS NOT NULL`: keeps real countries, drops the
/// World/continent/income-group aggregate rows.
pub fn countries_only<'a, I>(rows: I) -> Vec<&'a CaseRecord>
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    rows.into_iter().filter(|r| r.has_continent()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{case, day};

    #[test]
    fn like_wildcards_and_case() -> Result<()> {
        let states = LikePattern::new("%states%")?;
        assert!(states.matches("United States"));
        assert!(states.matches("UNITED STATES VIRGIN ISLANDS"));
        assert!(!states.matches("United Kingdom"));
        assert_eq!(states.as_str(), "%states%");

        let one = LikePattern::new("Ch_le")?;
        assert!(one.matches("Chile"));
        assert!(!one.matches("Chilee"));

        let literal = LikePattern::new("St. Kitts (and Nevis)")?;
        assert!(literal.matches("st. kitts (and nevis)"));
        assert!(!literal.matches("StX Kitts (and Nevis)"));
        Ok(())
    }

    #[test]
    fn drops_continent_null_rows() {
        let rows = vec![
            case("World", None, day(2021, 1, 1), Some(100), Some(5)),
            case("Chile", Some("South America"), day(2021, 1, 1), Some(10), Some(1)),
        ];
        let kept = countries_only(&rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].location, "Chile");
    }
}
