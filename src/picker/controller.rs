use crate::picker::format::{iso_date, long_date};
use crate::picker::grid::{render, DayCell, Grid};
use crate::picker::page::{CalendarPage, Navigation};
use chrono::NaiveDate;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Closed,
    Open,
}

/// Discrete user interactions the picker reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerEvent {
    /// The trigger field was activated.
    Activate,
    Navigate(Navigation),
    /// A day cell, by grid index (0..42).
    SelectCell(usize),
    OutsideClick,
    Escape,
}

/// The two output surfaces: the human-readable field and the hidden
/// machine-readable one. Both empty until something is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    pub display: String,
    pub value: String,
}

pub struct DatePicker {
    page: CalendarPage,
    selected: Option<NaiveDate>,
    state: PickerState,
    fields: FormFields,
    today: NaiveDate,
    close_delay: Duration,
    /// Set by a selection; the dropdown closes once this instant has passed.
    close_at: Option<Instant>,
    grid: Grid,
}

impl DatePicker {
    pub fn new(today: NaiveDate, close_delay: Duration) -> Self {
        let page = CalendarPage::containing(today).unwrap_or_else(|| {
            tracing::warn!(%today, "today is outside the renderable range, starting at default page");
            CalendarPage::default()
        });
        DatePicker {
            page,
            selected: None,
            state: PickerState::Closed,
            fields: FormFields::default(),
            today,
            close_delay,
            close_at: None,
            grid: render(page, None, today),
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state() == PickerState::Open
    }

    pub fn page(&self) -> CalendarPage {
        self.page
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// The grid as of the last render.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Header text, e.g. "January 2024".
    pub fn title(&self) -> String {
        self.page.to_string()
    }

    pub fn is_closing(&self) -> bool {
        self.close_at.is_some()
    }

    pub fn handle(&mut self, event: PickerEvent) {
        match event {
            PickerEvent::Activate => self.toggle(),
            PickerEvent::Navigate(nav) => self.navigate(nav),
            PickerEvent::SelectCell(index) => self.select_cell(index),
            PickerEvent::OutsideClick => self.dismiss(),
            PickerEvent::Escape => {
                if self.is_open() {
                    self.dismiss();
                }
            }
        }
    }

    pub fn toggle(&mut self) {
        self.close_at = None;
        match self.state {
            PickerState::Open => {
                self.state = PickerState::Closed;
                tracing::debug!("picker closed");
            }
            PickerState::Closed => {
                self.state = PickerState::Open;
                self.refresh();
                tracing::debug!(page = %self.page, "picker opened");
            }
        }
    }

    pub fn navigate(&mut self, nav: Navigation) {
        match self.page.step(nav) {
            Some(page) => {
                self.page = page;
                tracing::debug!(?nav, page = %page, "navigated");
            }
            None => tracing::warn!(?nav, page = %self.page, "navigation target out of range"),
        }
        self.refresh();
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected = Some(date);
        self.fields = FormFields {
            display: long_date(date),
            value: iso_date(date),
        };
        tracing::info!(value = %self.fields.value, "date selected");
        self.refresh();
        if self.close_delay.is_zero() {
            self.state = PickerState::Closed;
        } else if self.is_open() {
            self.close_at = Some(Instant::now() + self.close_delay);
        }
    }

    /// Selects the cell at `index` of the last render. Out-of-range indexes are ignored.
    pub fn select_cell(&mut self, index: usize) {
        match self.grid.get(index).copied() {
            Some(DayCell { date, .. }) => self.select_date(date),
            None => tracing::warn!(index, "no day cell at index"),
        }
    }

    pub fn dismiss(&mut self) {
        self.close_at = None;
        if self.is_open() {
            self.state = PickerState::Closed;
            tracing::debug!("picker dismissed");
        }
    }

    /// Fires a pending post-selection close once its delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.close_at {
            if now >= at {
                self.close_at = None;
                self.state = PickerState::Closed;
                tracing::debug!("picker closed after selection");
            }
        }
    }

    /// Keeps the today marker correct across midnight.
    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            self.today = today;
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        self.grid = render(self.page, self.selected, self.today);
    }
}
