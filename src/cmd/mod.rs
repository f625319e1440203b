pub mod format;
pub mod grid;
pub mod init;
pub mod root;

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Parses a `YYYY-MM-DD` argument.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}
