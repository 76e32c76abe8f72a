//! Clock times.

use chrono::NaiveTime;
use regex::Regex;

use crate::area::{AreaId, AreaTree};

use super::{normalized_text, Tag, Tagger};

/// Tags areas containing clock times such as `10:30`, `9.15 am` or `2 pm`.
///
/// Every candidate is validated as a real time of day.
pub struct TimeTagger {
    clock: Regex,
    hour_only: Regex,
    range_dash: Regex,
}

impl TimeTagger {
    /// Create the tagger.
    pub fn new() -> Self {
        Self {
            clock: Regex::new(r"(?i)\b(\d{1,2})[:.](\d{2})\b(?:\s*([ap])\.?m\b\.?)?").unwrap(),
            hour_only: Regex::new(r"(?i)\b(\d{1,2})\s*([ap])\.?m\b\.?").unwrap(),
            range_dash: Regex::new(r"^\s*(?:[-–—]|to|until)\s*$").unwrap(),
        }
    }

    fn valid(hour: u32, minute: u32, meridiem: Option<&str>) -> bool {
        let hour = match meridiem {
            None => hour,
            Some(_) if hour == 0 || hour > 12 => return false,
            Some(m) if m.eq_ignore_ascii_case("p") => hour % 12 + 12,
            Some(_) => hour % 12,
        };
        NaiveTime::from_hms_opt(hour, minute, 0).is_some()
    }

    /// Whether `start..end` is part of a dotted or slashed date such as
    /// `12.03.2024`.
    fn inside_date(text: &str, start: usize, end: usize) -> bool {
        let after = text[end..].chars().take(2).collect::<Vec<_>>();
        let before = text[..start].chars().rev().take(2).collect::<Vec<_>>();
        let joins = |c: &[char]| c.len() == 2 && matches!(c[0], '.' | '/') && c[1].is_ascii_digit();
        joins(&after) || joins(&before)
    }
}

impl Default for TimeTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Tagger for TimeTagger {
    fn tag(&self) -> Tag {
        Tag::new("time", "time")
    }

    fn relevance(&self) -> f64 {
        0.9
    }

    fn allows_continuation(&self, tree: &AreaTree, id: AreaId) -> bool {
        self.range_dash.is_match(&normalized_text(tree, id))
    }

    fn extract(&self, text: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();
        for caps in self.clock.captures_iter(text) {
            let (Some(h), Some(m)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if Self::inside_date(text, h.start(), m.end()) {
                continue;
            }
            let hour = h.as_str().parse().unwrap_or(99);
            let minute = m.as_str().parse().unwrap_or(99);
            if Self::valid(hour, minute, caps.get(3).map(|c| c.as_str())) {
                if let Some(all) = caps.get(0) {
                    found.push((all.start(), all.as_str().trim().to_string()));
                }
            }
        }
        for caps in self.hour_only.captures_iter(text) {
            let (Some(all), Some(h)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if found.iter().any(|(start, s)| all.start() >= *start && all.start() < start + s.len()) {
                continue;
            }
            let hour = h.as_str().parse().unwrap_or(99);
            if Self::valid(hour, 0, caps.get(2).map(|c| c.as_str())) {
                found.push((all.start(), all.as_str().trim().to_string()));
            }
        }
        found.sort_by_key(|(start, _)| *start);
        found.into_iter().map(|(_, s)| s).collect()
    }
}
