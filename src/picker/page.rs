use crate::picker::format::month_name;
use chrono::{Datelike, Days, NaiveDate};
use std::fmt;

/// Number of cells in a rendered month: six Sunday-first weeks.
pub const GRID_CELLS: usize = 42;

/// Navigation controls on the dropdown header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    PrevYear,
    PrevMonth,
    NextMonth,
    NextYear,
}

impl Navigation {
    fn months(self) -> i32 {
        match self {
            Navigation::PrevYear => -12,
            Navigation::PrevMonth => -1,
            Navigation::NextMonth => 1,
            Navigation::NextYear => 12,
        }
    }

    /// Glyph shown on the nav button.
    pub fn symbol(self) -> &'static str {
        match self {
            Navigation::PrevYear => "«",
            Navigation::PrevMonth => "‹",
            Navigation::NextMonth => "›",
            Navigation::NextYear => "»",
        }
    }
}

/// The month currently displayed by the grid.
///
/// Only constructible for months whose whole 42-cell grid fits in chrono's
/// date range, so rendering never has to deal with a missing date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarPage {
    first: NaiveDate,
    grid_start: NaiveDate,
}

impl CalendarPage {
    /// `month` is zero-based (0 = January).
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month.checked_add(1)?, 1)?;
        let leading = first.weekday().num_days_from_sunday() as u64;
        let grid_start = first.checked_sub_days(Days::new(leading))?;
        grid_start.checked_add_days(Days::new(GRID_CELLS as u64 - 1))?;
        Some(CalendarPage { first, grid_start })
    }

    /// The page showing the month that contains `date`.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        CalendarPage::new(date.year(), date.month0())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Zero-based month (0 = January .. 11 = December).
    pub fn month(&self) -> u32 {
        self.first.month0()
    }

    /// Date shown in the top-left cell.
    pub fn grid_start(&self) -> NaiveDate {
        self.grid_start
    }

    /// Weekday index (0 = Sunday) of the first of the month, i.e. how many
    /// cells belong to the previous month.
    pub fn leading_days(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month0() == self.month()
    }

    /// Moves by whole months, rolling the month index over into adjacent years.
    /// Returns None when the target cannot be rendered.
    pub fn offset_months(&self, months: i32) -> Option<Self> {
        let total = self
            .year()
            .checked_mul(12)?
            .checked_add(self.month() as i32)?
            .checked_add(months)?;
        CalendarPage::new(total.div_euclid(12), total.rem_euclid(12) as u32)
    }

    pub fn step(&self, nav: Navigation) -> Option<Self> {
        self.offset_months(nav.months())
    }
}

impl Default for CalendarPage {
    fn default() -> Self {
        let first = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        // 1970-01-01 is a Thursday.
        let grid_start = NaiveDate::from_ymd_opt(1969, 12, 28).unwrap_or_default();
        CalendarPage { first, grid_start }
    }
}

impl fmt::Display for CalendarPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", month_name(self.month() + 1), self.year())
    }
}
