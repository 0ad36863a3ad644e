//! Expiry-date interpretation for scanned documents.
//!
//! Everything here is pure: the vision model's raw reply and the current time
//! go in, a classified [`ExpiryExtraction`] comes out.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ExpiryConfig;

/// Token the vision model is told to answer with when it sees no date.
pub const NO_DATE_SENTINEL: &str = "NO_DATE_FOUND";

const ISO_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%B %d, %Y";
const SECONDS_PER_DAY: i64 = 86_400;

/// `%Y` accepts one to four digits; anything before this is a misread
/// two-digit year.
const MIN_FOUR_DIGIT_YEAR: i32 = 1000;

/// Tried in order after the strict ISO parse. Month-first slash dates come
/// before day-first ones, so `01/02/2025` is January 2nd and `31/12/2025`
/// still parses.
const PERMISSIVE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%m.%d.%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%B-%Y",
];

/// Two-digit years, tried only once every four-digit format has failed.
/// chrono maps `00..=68` to 2000s and `69..=99` to 1900s.
const TWO_DIGIT_YEAR_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%d/%m/%y",
    "%m-%d-%y",
    "%d-%m-%y",
    "%m.%d.%y",
    "%d.%m.%y",
    "%B %d, %y",
    "%B %d %y",
    "%d %B %y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Expired,
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn classify(days_until_expiry: i64, config: &ExpiryConfig) -> Self {
        if days_until_expiry <= 0 {
            Urgency::Expired
        } else if days_until_expiry <= config.high_urgency_days {
            Urgency::High
        } else if days_until_expiry <= config.reminder_window_days {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::Expired => write!(f, "expired"),
            Urgency::High => write!(f, "high"),
            Urgency::Medium => write!(f, "medium"),
            Urgency::Low => write!(f, "low"),
        }
    }
}

/// A reminder is worth creating only for documents that have not expired yet
/// but will within the reminder window.
pub fn should_create_reminder(days_until_expiry: i64, config: &ExpiryConfig) -> bool {
    days_until_expiry > 0 && days_until_expiry <= config.reminder_window_days
}

/// Whole days from `now` to the start of `date`, rounded down. A date earlier
/// today is already `-1`.
pub fn days_until(date: NaiveDate, now: NaiveDateTime) -> i64 {
    let delta = date.and_time(NaiveTime::MIN) - now;
    delta.num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// A successfully normalized expiry date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedExpiry {
    pub date: NaiveDate,
    pub days_until_expiry: i64,
    pub urgency: Urgency,
    pub should_create_reminder: bool,
    pub raw: String,
}

impl ParsedExpiry {
    pub fn iso_date(&self) -> String {
        self.date.format(ISO_FORMAT).to_string()
    }

    /// Human form, e.g. `December 31, 2025`.
    pub fn formatted_date(&self) -> String {
        self.date.format(DISPLAY_FORMAT).to_string()
    }
}

/// Outcome of reading an expiry date off a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryExtraction {
    /// A date was found and normalized.
    Parsed(ParsedExpiry),
    /// The model answered with something date-like that could not be
    /// normalized. Callers show the raw text as-is.
    Unparsed { raw: String },
    /// The model reported that the document has no expiry date.
    NotFound { raw: String },
    /// The model could not be asked at all.
    Failed { error: String },
}

impl ExpiryExtraction {
    pub fn found(&self) -> bool {
        matches!(
            self,
            ExpiryExtraction::Parsed(_) | ExpiryExtraction::Unparsed { .. }
        )
    }

    /// Model reply, when there was one.
    pub fn raw(&self) -> Option<&str> {
        match self {
            ExpiryExtraction::Parsed(parsed) => Some(&parsed.raw),
            ExpiryExtraction::Unparsed { raw } | ExpiryExtraction::NotFound { raw } => Some(raw),
            ExpiryExtraction::Failed { .. } => None,
        }
    }
}

/// Classify the vision model's reply relative to `now`.
pub fn interpret(raw: &str, now: NaiveDateTime, config: &ExpiryConfig) -> ExpiryExtraction {
    let raw = raw.trim().to_string();

    if raw.is_empty() || raw.to_uppercase().contains(NO_DATE_SENTINEL) {
        return ExpiryExtraction::NotFound { raw };
    }

    match parse_expiry_date(&raw) {
        Some(date) => {
            let days = days_until(date, now);
            ExpiryExtraction::Parsed(ParsedExpiry {
                date,
                days_until_expiry: days,
                urgency: Urgency::classify(days, config),
                should_create_reminder: should_create_reminder(days, config),
                raw,
            })
        }
        None => {
            tracing::warn!(raw = %raw, "Could not normalize extracted expiry date");
            ExpiryExtraction::Unparsed { raw }
        }
    }
}

/// Strict `YYYY-MM-DD` first, then the permissive fallbacks.
pub fn parse_expiry_date(text: &str) -> Option<NaiveDate> {
    let cleaned = strip_label(text);
    parse_strict(&cleaned).or_else(|| parse_permissive(&cleaned))
}

pub fn parse_strict(text: &str) -> Option<NaiveDate> {
    parse_four_digit_year(text.trim(), ISO_FORMAT)
}

fn parse_four_digit_year(text: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, format)
        .ok()
        .filter(|date| date.year() >= MIN_FOUR_DIGIT_YEAR)
}

fn parse_permissive(text: &str) -> Option<NaiveDate> {
    let normalized = ordinal_regex()
        .replace_all(text.trim().trim_end_matches('.'), "$1")
        .to_string();

    if let Some(date) = PERMISSIVE_FORMATS
        .iter()
        .find_map(|format| parse_four_digit_year(&normalized, format))
        .or_else(|| {
            TWO_DIGIT_YEAR_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(&normalized, format).ok())
        })
    {
        return Some(date);
    }

    // Reply with surrounding prose, e.g. "The document expires on 2026-03-01."
    embedded_iso_regex()
        .find(&normalized)
        .and_then(|m| parse_strict(m.as_str()))
}

fn strip_label(text: &str) -> String {
    label_regex().replace(text.trim(), "").trim().to_string()
}

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(expiry|expiration|expires|valid\s+until|validity)(\s+date)?\s*[:\-]?\s*")
            .expect("valid label regex")
    })
}

fn ordinal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid ordinal regex"))
}

fn embedded_iso_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("valid date regex"))
}
