//! Date helpers for cataloging fields
//!
//! MARC fixed fields carry the date a record was entered as YYMMDD, and the
//! local batch field carries the processing date as YYYYMMDD. Callers pass the
//! date in so record construction stays deterministic under test.

use chrono::{Local, NaiveDate};

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as YYMMDD (2-digit year)
pub fn yymmdd(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// Format a date as YYYYMMDD (4-digit year)
pub fn yyyymmdd(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
