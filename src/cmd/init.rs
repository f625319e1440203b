use crate::data::PickerSettings;
use anyhow::Result;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    run_in_dir(&dir)?;
    println!("Settings written to {}", dir.join("settings.yaml").display());
    Ok(())
}

/// Writes the default settings file into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    PickerSettings::default().save_to(dir)
}
