use crate::cmd::parse_date;
use crate::picker::{iso_date, long_date};
use anyhow::Result;
use chrono::NaiveDate;
use std::io::Write;

pub fn run(date: &str) -> Result<()> {
    let date = parse_date(date)?;
    write_formats(date, &mut std::io::stdout())
}

pub(crate) fn write_formats<W: Write>(date: NaiveDate, out: &mut W) -> Result<()> {
    writeln!(out, "  {:<8} {}", "Display", long_date(date))?;
    writeln!(out, "  {:<8} {}", "Value", iso_date(date))?;
    Ok(())
}
