use chrono::{Datelike, NaiveDate};

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Number of days in `month` (1-based). Returns 0 for a month chrono cannot represent.
#[cfg(test)]
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
        .unwrap_or(0)
}

/// en-US long form, e.g. "January 5, 2024". Years before 1 AD are shown with a BC era.
pub fn long_date(date: NaiveDate) -> String {
    let (is_ce, year) = date.year_ce();
    let era = if is_ce { "" } else { " BC" };
    format!(
        "{} {}, {}{}",
        month_name(date.month()),
        date.day(),
        year,
        era
    )
}

/// Fixed-width `YYYY-MM-DD`. Years outside 0..=9999 use the expanded
/// `±YYYYYY-MM-DD` form so the output stays sortable and parseable.
pub fn iso_date(date: NaiveDate) -> String {
    let year = date.year();
    if (0..=9999).contains(&year) {
        format!("{:04}-{:02}-{:02}", year, date.month(), date.day())
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        format!(
            "{}{:06}-{:02}-{:02}",
            sign,
            year.unsigned_abs(),
            date.month(),
            date.day()
        )
    }
}
