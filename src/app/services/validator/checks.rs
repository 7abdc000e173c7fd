//! Field-level well-formedness checks
//!
//! URL and date checks shared across categories. Both accept the empty
//! string: absence is handled by the mandatory/expected field sets, not here.

use crate::constants::DATE_FORMAT;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn year_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}$").expect("static pattern"))
}

fn year_month_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}$").expect("static pattern"))
}

/// Whether a value is empty or a syntactically valid absolute URL.
///
/// Relative references and scheme-only values are rejected; a URL without a
/// host is no use as a cross-reference.
pub fn is_valid_url(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    match Url::parse(value) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}

/// Whether a value is empty or parses as a calendar date.
///
/// Partial dates are left-padded before parsing: `YYYY` becomes
/// `YYYY-01-01` and `YYYY-MM` becomes `YYYY-MM-01`, matching how registers
/// record imprecise lifecycle dates.
pub fn is_valid_date(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }

    let mut date = value.to_string();
    if year_only().is_match(&date) {
        date.push_str("-01");
    }
    if year_month_only().is_match(&date) {
        date.push_str("-01");
    }

    NaiveDate::parse_from_str(&date, DATE_FORMAT).is_ok()
}
