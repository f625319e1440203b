use crate::data::PickerSettings;
use crate::picker::FormFields;
use crate::ui::picker_view::{run_app, PickerApp};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;
use std::io::Write;

pub fn run() -> Result<()> {
    let settings = PickerSettings::load()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let today = Local::now().date_naive();
    tracing::info!(%today, "starting picker");
    let mut app = PickerApp::new(settings, today);

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    result?;
    tracing::info!(selected = ?app.selected(), "picker exited");

    write_fields(&app.settings.field_name, app.fields(), &mut std::io::stdout())
}

/// Prints the submitted form values: `name=YYYY-MM-DD` then the display text.
pub(crate) fn write_fields<W: Write>(name: &str, fields: &FormFields, out: &mut W) -> Result<()> {
    if fields.value.is_empty() {
        writeln!(out, "{}=", name)?;
        return Ok(());
    }
    writeln!(out, "{}={}", name, fields.value)?;
    writeln!(out, "{}", fields.display)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_fields_selected() {
        let fields = FormFields {
            display: "January 5, 2024".to_string(),
            value: "2024-01-05".to_string(),
        };
        let mut buf = Vec::new();
        write_fields("date_of_birth", &fields, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "date_of_birth=2024-01-05\nJanuary 5, 2024\n");
    }

    #[test]
    fn test_write_fields_empty() {
        let mut buf = Vec::new();
        write_fields("check_in", &FormFields::default(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "check_in=\n");
    }
}
