use crate::picker::page::{CalendarPage, GRID_CELLS};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const WEEKDAY_HEADER: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// One rendered grid position. Rebuilt on every render, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

/// The 6×7 projection of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub year: i32,
    /// Zero-based, like [`CalendarPage::month`].
    pub month: u32,
    pub cells: Vec<DayCell>,
}

impl Grid {
    pub fn get(&self, index: usize) -> Option<&DayCell> {
        self.cells.get(index)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_selected)
    }

    pub fn today_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_today)
    }
}

/// Projects a page into its 42 cells, Sunday first.
///
/// The first `leading_days` cells are the tail of the previous month (ending on
/// its last day), followed by every day of the displayed month, then the next
/// month counting up from 1 until the grid is full.
pub fn render(page: CalendarPage, selected: Option<NaiveDate>, today: NaiveDate) -> Grid {
    let cells = page
        .grid_start()
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| DayCell {
            date,
            day: date.day(),
            in_month: page.contains(date),
            is_today: date == today,
            is_selected: selected == Some(date),
        })
        .collect();
    Grid {
        year: page.year(),
        month: page.month(),
        cells,
    }
}
