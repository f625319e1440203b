use crate::data::persistence::{get_data_dir, Persistable};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PickerSettings {
    /// Label shown on the trigger field.
    pub label: String,
    /// Name of the hidden machine-readable field, printed as `name=value` on exit.
    pub field_name: String,
    /// How long the dropdown stays open after a selection.
    pub close_delay_ms: u64,
}

impl Default for PickerSettings {
    fn default() -> Self {
        PickerSettings {
            label: "Date of birth".to_string(),
            field_name: "date_of_birth".to_string(),
            close_delay_ms: 300,
        }
    }
}

impl PickerSettings {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsFile::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        SettingsFile {
            settings: self.clone(),
        }
        .save_to(dir)
    }
}

/// On-disk shape of settings.yaml: everything lives under a `settings` key.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsFile {
    #[serde(default)]
    settings: PickerSettings,
}

impl Persistable for SettingsFile {
    fn filename() -> &'static str {
        "settings.yaml"
    }
}
