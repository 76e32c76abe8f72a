//! Calendar dates.

use chrono::NaiveDate;
use regex::Regex;

use super::{Tag, Tagger};

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Year used to validate dates written without one (a leap year, so that
/// February 29 passes).
const LEAP_YEAR: i32 = 2000;

/// Tags areas containing calendar dates.
///
/// Recognised forms: `31.12.2024`, `12/31/2024`, `2024-12-31`,
/// `3 March 2024`, `March 3rd, 2024` and `March 3`. Numeric dates are
/// read day first and fall back to month first for slashes. Every
/// candidate must be a real calendar date.
pub struct DateTagger {
    numeric: Regex,
    iso: Regex,
    day_month: Regex,
    month_day: Regex,
}

fn month_pattern() -> &'static str {
    r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)"
}

fn month_number(name: &str) -> Option<u32> {
    let key: String = name.chars().take(3).collect::<String>().to_lowercase();
    MONTHS.iter().position(|m| *m == key).map(|i| i as u32 + 1)
}

fn valid(year: i32, month: u32, day: u32) -> bool {
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

impl DateTagger {
    /// Create the tagger.
    pub fn new() -> Self {
        let month = month_pattern();
        Self {
            numeric: Regex::new(r"\b(\d{1,2})([./])(\d{1,2})[./](\d{4})\b").unwrap(),
            iso: Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap(),
            day_month: Regex::new(&format!(
                r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\.?\s+{}\.?,?\s+(\d{{4}})\b",
                month
            ))
            .unwrap(),
            month_day: Regex::new(&format!(
                r"(?i)\b{}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(\d{{4}})\b)?",
                month
            ))
            .unwrap(),
        }
    }

    fn numeric_valid(&self, a: u32, sep: &str, b: u32, year: i32) -> bool {
        valid(year, b, a) || (sep == "/" && valid(year, a, b))
    }
}

impl Default for DateTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Tagger for DateTagger {
    fn tag(&self) -> Tag {
        Tag::new("date", "date")
    }

    fn relevance(&self) -> f64 {
        0.9
    }

    fn extract(&self, text: &str) -> Vec<String> {
        let mut found: Vec<(usize, usize, String)> = Vec::new();
        let mut push = |start: usize, end: usize, s: &str| {
            if !found.iter().any(|(a, b, _)| start < *b && end > *a) {
                found.push((start, end, s.to_string()));
            }
        };

        for c in self.iso.captures_iter(text) {
            let year = c[1].parse().unwrap_or(0);
            let month = c[2].parse().unwrap_or(0);
            let day = c[3].parse().unwrap_or(0);
            if valid(year, month, day) {
                if let Some(m) = c.get(0) {
                    push(m.start(), m.end(), m.as_str());
                }
            }
        }
        for c in self.numeric.captures_iter(text) {
            let a = c[1].parse().unwrap_or(0);
            let b = c[3].parse().unwrap_or(0);
            let year = c[4].parse().unwrap_or(0);
            if self.numeric_valid(a, &c[2], b, year) {
                if let Some(m) = c.get(0) {
                    push(m.start(), m.end(), m.as_str());
                }
            }
        }
        for c in self.day_month.captures_iter(text) {
            let day = c[1].parse().unwrap_or(0);
            let year = c[3].parse().unwrap_or(0);
            if month_number(&c[2]).is_some_and(|month| valid(year, month, day)) {
                if let Some(m) = c.get(0) {
                    push(m.start(), m.end(), m.as_str());
                }
            }
        }
        for c in self.month_day.captures_iter(text) {
            let day = c[2].parse().unwrap_or(0);
            let year = c.get(3).and_then(|y| y.as_str().parse().ok()).unwrap_or(LEAP_YEAR);
            if month_number(&c[1]).is_some_and(|month| valid(year, month, day)) {
                if let Some(m) = c.get(0) {
                    push(m.start(), m.end(), m.as_str());
                }
            }
        }

        found.sort_by_key(|(start, _, _)| *start);
        found.into_iter().map(|(_, _, s)| s).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_dates() {
        let t = DateTagger::new();
        assert_eq!(t.extract("Deadline 31.12.2024"), vec!["31.12.2024"]);
        assert_eq!(t.extract("on 12/31/2024"), vec!["12/31/2024"]);
        assert_eq!(t.extract("2024-02-29"), vec!["2024-02-29"]);
    }

    #[test]
    fn test_impossible_dates_rejected() {
        let t = DateTagger::new();
        assert!(t.extract("31.02.2024").is_empty());
        assert!(t.extract("2023-02-29").is_empty());
        assert!(t.extract("March 32").is_empty());
    }

    #[test]
    fn test_month_names() {
        let t = DateTagger::new();
        assert_eq!(t.extract("Friday, 3 March 2024"), vec!["3 March 2024"]);
        assert_eq!(t.extract("March 3rd, 2024 in Brno"), vec!["March 3rd, 2024"]);
        assert_eq!(t.extract("Sept 14"), vec!["Sept 14"]);
    }
}
