pub mod controller;
pub mod format;
pub mod grid;
pub mod page;

pub use controller::{DatePicker, FormFields, PickerEvent};
pub use format::{iso_date, long_date};
pub use grid::{render, DayCell, Grid, WEEKDAY_HEADER};
pub use page::{CalendarPage, Navigation, GRID_CELLS};
