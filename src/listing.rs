//! Listing Page Import Module
//!
//! Extracts scholarship records from listing pages saved to disk. Two page
//! layouts are understood:
//! - scholarships.com award boxes (`.award-box`)
//! - buddy4study listing cards (`Listing_*` CSS-module classes), either the
//!   dated listing or the always-open listing
//!
//! Deadlines are normalized to `%d-%m-%Y`. A card that cannot be read is
//! skipped and counted; it never aborts the rest of the page.

use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::sorter::parse_deadline;
use crate::types::ScholarshipRecord;

pub const DEADLINE_FORMAT: &str = "%d-%m-%Y";
pub const ALWAYS_OPEN: &str = "Always";
/// scholarships.com cards carry no eligibility text.
pub const UNSPECIFIED_ELIGIBILITY: &str = "None";

const SCHOLARSHIPS_COM_BASE: &str = "https://www.scholarships.com";
const BUDDY4STUDY_BASE: &str = "https://www.buddy4study.com";

lazy_static! {
    static ref DAYS_TO_GO: Regex = Regex::new(r"(\d+)\s+days?\s+to\s+go").expect("valid days pattern");
    static ref LAST_DAY: Regex = Regex::new(r"last\s+day\s+to\s+go").expect("valid last-day pattern");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingLayout {
    ScholarshipsCom,
    Buddy4Study,
    /// Listing of scholarships without a deadline.
    Buddy4StudyOpen,
}

impl FromStr for ListingLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "scholarships_com" | "scholarships.com" => Ok(ListingLayout::ScholarshipsCom),
            "buddy4study" => Ok(ListingLayout::Buddy4Study),
            "buddy4study_open" => Ok(ListingLayout::Buddy4StudyOpen),
            other => Err(anyhow!(
                "unknown listing layout '{}' (expected scholarships_com, buddy4study or buddy4study_open)",
                other
            )),
        }
    }
}

/// How a listing's deadline text should be treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingDeadline {
    On(NaiveDate),
    Closed,
    Unrecognized,
}

/// Interpret deadline text as shown on listing cards.
///
/// "12 days to go" counts from `today`, "Last day to go" is `today`,
/// "closed" marks a finished listing, anything else is parsed as a date.
pub fn normalize_listing_deadline(text: &str, today: NaiveDate) -> ListingDeadline {
    let lower = text.trim().to_lowercase();

    if let Some(caps) = DAYS_TO_GO.captures(&lower) {
        return match caps[1].parse::<i64>() {
            Ok(days) => Duration::try_days(days)
                .and_then(|delta| today.checked_add_signed(delta))
                .map(ListingDeadline::On)
                .unwrap_or(ListingDeadline::Unrecognized),
            Err(_) => ListingDeadline::Unrecognized,
        };
    }
    if LAST_DAY.is_match(&lower) {
        return ListingDeadline::On(today);
    }
    if lower == "closed" {
        return ListingDeadline::Closed;
    }
    match parse_deadline(text) {
        Some(date) => ListingDeadline::On(date),
        None => ListingDeadline::Unrecognized,
    }
}

#[derive(Debug, Default)]
pub struct ListingImport {
    pub records: Vec<ScholarshipRecord>,
    pub skipped: usize,
}

/// Parse a saved listing page.
pub fn parse_listing(html: &str, layout: ListingLayout, today: NaiveDate) -> Result<ListingImport> {
    let document = Html::parse_document(html);
    let import = match layout {
        ListingLayout::ScholarshipsCom => parse_scholarships_com(&document)?,
        ListingLayout::Buddy4Study => parse_buddy4study(&document, today, false)?,
        ListingLayout::Buddy4StudyOpen => parse_buddy4study(&document, today, true)?,
    };
    tracing::info!(
        layout = ?layout,
        found = import.records.len(),
        skipped = import.skipped,
        "parsed listing page"
    );
    Ok(import)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {}: {}", css, e))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn absolute_link(href: &str, base: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        href.to_string()
    }
}

/// Text of the first `span` after the `em` labelled `label`.
fn labelled_value(card: ElementRef<'_>, em: &Selector, label: &str) -> Option<String> {
    let label_el = card.select(em).find(|e| element_text(*e) == label)?;
    label_el
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "span")
        .map(element_text)
}

fn parse_scholarships_com(document: &Html) -> Result<ListingImport> {
    let card_sel = selector(".award-box")?;
    let name_sel = selector("h2")?;
    let em_sel = selector("em")?;
    let link_sel = selector("a[href]")?;

    let mut import = ListingImport::default();
    for (idx, card) in document.select(&card_sel).enumerate() {
        let name = card.select(&name_sel).next().map(element_text).unwrap_or_default();
        if name.is_empty() {
            tracing::warn!(card = idx, "award box without a name, skipping");
            import.skipped += 1;
            continue;
        }

        let award = labelled_value(card, &em_sel, "Amount").unwrap_or_default();
        let deadline_text = labelled_value(card, &em_sel, "Deadline").unwrap_or_default();
        let deadline = match parse_deadline(&deadline_text) {
            Some(date) => date.format(DEADLINE_FORMAT).to_string(),
            None => {
                tracing::warn!(name = %name, deadline = %deadline_text, "unreadable deadline, skipping");
                import.skipped += 1;
                continue;
            }
        };
        let link = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| absolute_link(href, SCHOLARSHIPS_COM_BASE))
            .unwrap_or_default();

        import.records.push(ScholarshipRecord {
            name,
            award,
            eligibility: UNSPECIFIED_ELIGIBILITY.to_string(),
            address: String::new(),
            link,
            deadline,
        });
    }
    Ok(import)
}

fn parse_buddy4study(document: &Html, today: NaiveDate, always_open: bool) -> Result<ListingImport> {
    let card_sel = selector(r#"[class*="Listing_categoriesBox"]"#)?;
    let name_sel = selector(r#"[class*="Listing_scholarshipName"]"#)?;
    let award_sel = selector(r#"[class*="Listing_awardCont"] p"#)?;
    let deadline_sel = selector(r#"[class*="Listing_daystoGo"]"#)?;

    let mut import = ListingImport::default();
    for (idx, card) in document.select(&card_sel).enumerate() {
        let name = card.select(&name_sel).next().map(element_text).unwrap_or_default();
        if name.is_empty() {
            tracing::warn!(card = idx, "listing card without a name, skipping");
            import.skipped += 1;
            continue;
        }

        let mut details = card.select(&award_sel).map(element_text);
        let award = details.next().unwrap_or_default();
        let eligibility = details.next().unwrap_or_default();

        let deadline = if always_open {
            ALWAYS_OPEN.to_string()
        } else {
            let text = card.select(&deadline_sel).next().map(element_text).unwrap_or_default();
            match normalize_listing_deadline(&text, today) {
                ListingDeadline::On(date) => date.format(DEADLINE_FORMAT).to_string(),
                ListingDeadline::Closed => {
                    tracing::debug!(name = %name, "closed listing, skipping");
                    import.skipped += 1;
                    continue;
                }
                ListingDeadline::Unrecognized => {
                    tracing::warn!(name = %name, deadline = %text, "unreadable deadline, skipping");
                    import.skipped += 1;
                    continue;
                }
            }
        };

        let link = card
            .value()
            .attr("href")
            .map(|href| absolute_link(href, BUDDY4STUDY_BASE))
            .unwrap_or_default();

        import.records.push(ScholarshipRecord {
            name,
            award,
            eligibility,
            address: String::new(),
            link,
            deadline,
        });
    }
    Ok(import)
}
