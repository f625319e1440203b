pub mod persistence;
pub mod settings;

pub use settings::PickerSettings;
