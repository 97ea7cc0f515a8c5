use crate::types::ScoredScholarship;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBER_RUN: Regex = Regex::new(r"[\d\.,]+").expect("valid number pattern");
    static ref EMBEDDED_ISO_DATE: Regex =
        Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").expect("valid date pattern");
}

/// Formats tried in order. Stored deadlines are written as `%d-%m-%Y`, so it goes first.
const DEADLINE_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%Y/%m/%d",
];

/// Largest number in an award description, truncated to an integer.
///
/// "$1,200 - $5,000" gives 5000. Runs that do not parse (e.g. "1.2.3") are skipped.
pub fn extract_numeric_amount(award: &str) -> u64 {
    NUMBER_RUN
        .find_iter(award)
        .filter_map(|m| m.as_str().replace(',', "").trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.trunc() as u64)
        .max()
        .unwrap_or(0)
}

/// Parse a free-form deadline string.
pub fn parse_deadline(deadline: &str) -> Option<NaiveDate> {
    let deadline = deadline.trim();
    if deadline.is_empty() {
        return None;
    }

    for fmt in DEADLINE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(deadline, fmt) {
            return Some(date);
        }
    }

    // "Deadline: 2026-03-31 (extended)"
    let caps = EMBEDDED_ISO_DATE.captures(deadline)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `1 / (days_left + 1)`; 0.0 when the deadline has passed or cannot be parsed.
pub fn deadline_urgency(deadline: &str, today: NaiveDate) -> f64 {
    let Some(date) = parse_deadline(deadline) else {
        return 0.0;
    };
    let days = (date - today).num_days();
    if days < 0 {
        return 0.0;
    }
    1.0 / (days as f64 + 1.0)
}

/// Sort by final score, highest first. Equal scores keep their input order.
pub fn sort_by_final_score(scored: &mut [ScoredScholarship]) {
    scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
}
