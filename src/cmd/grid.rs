use crate::cmd::parse_date;
use crate::picker::{render, CalendarPage, DayCell, Grid, WEEKDAY_HEADER};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::io::Write;

const CELL_WIDTH: usize = 4;

pub fn run(month: Option<&str>, selected: Option<&str>, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let page = match month {
        Some(m) => parse_month(m)?,
        None => CalendarPage::containing(today).unwrap_or_default(),
    };
    let selected = selected.map(parse_date).transpose()?;
    let grid = render(page, selected, today);

    let mut out = std::io::stdout();
    if json {
        let body = serde_json::to_string_pretty(&grid).context("failed to serialize grid")?;
        writeln!(out, "{}", body)?;
        Ok(())
    } else {
        write_grid(&page, &grid, &mut out)
    }
}

/// Parses a `YYYY-MM` argument into a page.
pub(crate) fn parse_month(s: &str) -> Result<CalendarPage> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{}', expected YYYY-MM", s))?;
    CalendarPage::containing(first).with_context(|| format!("month '{}' is out of range", s))
}

fn cell_label(cell: &DayCell) -> String {
    if cell.is_selected {
        format!("[{}]", cell.day)
    } else if cell.is_today {
        format!("<{}>", cell.day)
    } else if !cell.in_month {
        format!("({})", cell.day)
    } else {
        cell.day.to_string()
    }
}

pub(crate) fn write_grid<W: Write>(page: &CalendarPage, grid: &Grid, out: &mut W) -> Result<()> {
    let width = CELL_WIDTH * 7;
    writeln!(out, "{:^width$}", page.to_string(), width = width)?;
    let header: String = WEEKDAY_HEADER
        .iter()
        .map(|d| format!("{:>w$}", d, w = CELL_WIDTH))
        .collect();
    writeln!(out, "{}", header)?;
    for week in grid.rows() {
        let row: String = week
            .iter()
            .map(|c| format!("{:>w$}", cell_label(c), w = CELL_WIDTH))
            .collect();
        writeln!(out, "{}", row)?;
    }
    writeln!(out, "---")?;
    writeln!(out, "[d] selected  <d> today  (d) other month")?;
    Ok(())
}
