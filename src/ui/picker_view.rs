use crate::data::PickerSettings;
use crate::picker::{
    DatePicker, FormFields, Navigation, PickerEvent, GRID_CELLS, WEEKDAY_HEADER,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::{Duration as StdDuration, Instant};

const ACCENT: Color = Color::Rgb(74, 144, 226);

// Dropdown: border + nav row + weekday header + 6 weeks + border.
const WIDGET_WIDTH: u16 = 27;
const GRID_WIDTH: u16 = 21;
const FIELD_HEIGHT: u16 = 3;
const DROPDOWN_HEIGHT: u16 = 10;
const MIN_HEIGHT: u16 = FIELD_HEIGHT + 1 + DROPDOWN_HEIGHT + 1;

/// Screen regions recorded at the last draw, used to route mouse clicks.
#[derive(Default)]
struct HitAreas {
    field: Rect,
    dropdown: Option<Rect>,
    nav: Vec<(Navigation, Rect)>,
    cells: Vec<Rect>,
}

pub struct PickerApp {
    picker: DatePicker,
    pub settings: PickerSettings,
    /// Grid index the keyboard cursor is on.
    focus: usize,
    hits: HitAreas,
}

impl PickerApp {
    pub fn new(settings: PickerSettings, today: NaiveDate) -> Self {
        let picker = DatePicker::new(today, settings.close_delay());
        let mut app = PickerApp {
            picker,
            settings,
            focus: 0,
            hits: HitAreas::default(),
        };
        app.reset_focus();
        app
    }

    pub fn fields(&self) -> &FormFields {
        self.picker.fields()
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.picker.selected()
    }

    pub fn tick(&mut self, now: Instant, today: NaiveDate) {
        self.picker.set_today(today);
        self.picker.tick(now);
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            _ => {}
        }

        if !self.picker.is_open() {
            if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
                self.picker.handle(PickerEvent::Activate);
                self.reset_focus();
            }
            return false;
        }

        match code {
            KeyCode::Esc => self.picker.handle(PickerEvent::Escape),
            KeyCode::Left => self.move_focus(-1),
            KeyCode::Right => self.move_focus(1),
            KeyCode::Up => self.move_focus(-7),
            KeyCode::Down => self.move_focus(7),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.picker.handle(PickerEvent::SelectCell(self.focus))
            }
            KeyCode::Char('[') | KeyCode::PageUp => self.navigate(Navigation::PrevMonth),
            KeyCode::Char(']') | KeyCode::PageDown => self.navigate(Navigation::NextMonth),
            KeyCode::Char('{') => self.navigate(Navigation::PrevYear),
            KeyCode::Char('}') => self.navigate(Navigation::NextYear),
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let pos = Position::new(mouse.column, mouse.row);

        if self.hits.field.contains(pos) {
            self.picker.handle(PickerEvent::Activate);
            self.reset_focus();
        } else if self.picker.is_open() && self.hits.dropdown.is_some_and(|r| r.contains(pos)) {
            let nav = self
                .hits
                .nav
                .iter()
                .find(|(_, r)| r.contains(pos))
                .map(|(nav, _)| *nav);
            if let Some(nav) = nav {
                self.navigate(nav);
            } else if let Some(index) = self.hits.cells.iter().position(|r| r.contains(pos)) {
                self.focus = index;
                self.picker.handle(PickerEvent::SelectCell(index));
            }
        } else {
            self.picker.handle(PickerEvent::OutsideClick);
        }
    }

    fn navigate(&mut self, nav: Navigation) {
        self.picker.handle(PickerEvent::Navigate(nav));
        self.reset_focus();
    }

    fn move_focus(&mut self, delta: isize) {
        self.focus = self.focus.saturating_add_signed(delta).min(GRID_CELLS - 1);
    }

    /// Focus the selected day, else today, else the 1st of the displayed month.
    fn reset_focus(&mut self) {
        let grid = self.picker.grid();
        self.focus = grid
            .selected_index()
            .or_else(|| grid.today_index())
            .unwrap_or(self.picker.page().leading_days() as usize);
    }

    pub fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        self.hits = HitAreas::default();

        if area.width < WIDGET_WIDTH || area.height < MIN_HEIGHT {
            f.render_widget(Paragraph::new("Terminal too small"), area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Length(1), // hidden value
                Constraint::Length(DROPDOWN_HEIGHT),
                Constraint::Min(1), // help
            ])
            .split(area);

        self.render_field(f, Rect { width: WIDGET_WIDTH, ..chunks[0] });
        self.render_value(f, chunks[1]);
        if self.picker.is_open() {
            self.render_dropdown(f, Rect { width: WIDGET_WIDTH, ..chunks[2] });
        }
        self.render_help(f, chunks[3]);
    }

    fn render_field(&mut self, f: &mut Frame, area: Rect) {
        let fields = self.picker.fields();
        let text = if fields.display.is_empty() {
            Span::styled("Select a date", Style::default().add_modifier(Modifier::DIM))
        } else {
            Span::raw(fields.display.clone())
        };
        let border = if self.picker.is_open() {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        };
        let p = Paragraph::new(Line::from(vec![Span::raw(" "), text])).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(self.settings.label.clone()),
        );
        f.render_widget(p, area);
        self.hits.field = area;
    }

    fn render_value(&self, f: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                format!("{}=", self.settings.field_name),
                Style::default().add_modifier(Modifier::DIM),
            ),
            Span::styled(
                self.picker.fields().value.clone(),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_dropdown(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT));
        let inner = block.inner(area);
        f.render_widget(block, area);
        self.hits.dropdown = Some(area);

        // ── Nav row: « ‹ title › » ──────────────────────────────────────────
        let nav_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        let right = inner.x + inner.width;
        let nav_rects = [
            (Navigation::PrevYear, Rect::new(inner.x, inner.y, 2, 1)),
            (Navigation::PrevMonth, Rect::new(inner.x + 2, inner.y, 2, 1)),
            (Navigation::NextMonth, Rect::new(right - 4, inner.y, 2, 1)),
            (Navigation::NextYear, Rect::new(right - 2, inner.y, 2, 1)),
        ];
        for (nav, rect) in nav_rects {
            let label = match nav {
                Navigation::PrevYear | Navigation::PrevMonth => format!("{} ", nav.symbol()),
                Navigation::NextMonth | Navigation::NextYear => format!(" {}", nav.symbol()),
            };
            f.render_widget(Paragraph::new(Span::styled(label, nav_style)), rect);
        }
        self.hits.nav = nav_rects.to_vec();

        let title = Paragraph::new(Span::styled(
            self.picker.title(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        f.render_widget(title, Rect::new(inner.x + 4, inner.y, inner.width - 8, 1));

        // ── Weekday header and 6×7 grid ─────────────────────────────────────
        let grid_x = inner.x + (inner.width - GRID_WIDTH) / 2;
        let header = Paragraph::new(Span::styled(
            WEEKDAY_HEADER.join(" "),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        f.render_widget(header, Rect::new(grid_x, inner.y + 1, GRID_WIDTH, 1));

        let grid = self.picker.grid();
        let mut lines: Vec<Line> = Vec::new();
        for (row, week) in grid.rows().enumerate() {
            let mut spans = Vec::new();
            for (col, cell) in week.iter().enumerate() {
                let index = row * 7 + col;
                let style = calendar_day_style(
                    cell.is_selected,
                    cell.is_today,
                    cell.in_month,
                    index == self.focus,
                );
                spans.push(Span::styled(format!("{:2}", cell.day), style));
                spans.push(Span::raw(" "));
                self.hits.cells.push(Rect::new(
                    grid_x + col as u16 * 3,
                    inner.y + 2 + row as u16,
                    3,
                    1,
                ));
            }
            lines.push(Line::from(spans));
        }
        f.render_widget(
            Paragraph::new(lines),
            Rect::new(grid_x, inner.y + 2, GRID_WIDTH, 6),
        );
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help = if self.picker.is_closing() {
            "Selected"
        } else if self.picker.is_open() {
            "←↑↓→ move  Enter pick  [ ] month  { } year  Esc close  q quit"
        } else {
            "Enter open  q quit"
        };
        let p = Paragraph::new(Span::styled(
            help,
            Style::default().add_modifier(Modifier::DIM),
        ));
        f.render_widget(p, area);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut PickerApp) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
        app.tick(Instant::now(), Local::now().date_naive());
    }
    Ok(())
}

/// Determines the ratatui `Style` for a day cell based on its state.
pub(crate) fn calendar_day_style(
    is_selected: bool,
    is_today: bool,
    in_month: bool,
    is_focused: bool,
) -> Style {
    if is_selected {
        let s = Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD);
        if is_focused {
            s.add_modifier(Modifier::UNDERLINED)
        } else {
            s
        }
    } else if is_focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else if is_today {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else if !in_month {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_app() -> PickerApp {
        PickerApp::new(PickerSettings::default(), d(2024, 1, 15))
    }

    fn press(app: &mut PickerApp, code: KeyCode) -> bool {
        app.handle_key(code, KeyModifiers::empty())
    }

    fn click(app: &mut PickerApp, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        });
    }

    fn draw(app: &mut PickerApp, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── calendar_day_style tests ──────────────────────────────────────────────

    #[test]
    fn test_style_selected() {
        let s = calendar_day_style(true, true, true, false);
        assert_eq!(s, Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD));
    }

    #[test]
    fn test_style_selected_focused() {
        let s = calendar_day_style(true, false, true, true);
        assert_eq!(
            s,
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        );
    }

    #[test]
    fn test_style_focused() {
        let s = calendar_day_style(false, true, true, true);
        assert_eq!(s, Style::default().add_modifier(Modifier::REVERSED));
    }

    #[test]
    fn test_style_today() {
        let s = calendar_day_style(false, true, true, false);
        assert_eq!(
            s,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        );
    }

    #[test]
    fn test_style_other_month() {
        let s = calendar_day_style(false, false, false, false);
        assert_eq!(s, Style::default().add_modifier(Modifier::DIM));
    }

    #[test]
    fn test_style_plain() {
        assert_eq!(calendar_day_style(false, false, true, false), Style::default());
    }

    // ── handle_key tests ──────────────────────────────────────────────────────

    #[test]
    fn test_enter_opens_and_esc_closes() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        assert!(app.picker.is_open());
        press(&mut app, KeyCode::Esc);
        assert!(!app.picker.is_open());
    }

    #[test]
    fn test_esc_when_closed_is_noop() {
        let mut app = make_app();
        assert!(!press(&mut app, KeyCode::Esc));
        assert!(!app.picker.is_open());
    }

    #[test]
    fn test_focus_starts_on_today() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        // one leading cell (Dec 31) before Jan 1
        assert_eq!(app.focus, 15);
    }

    #[test]
    fn test_arrow_keys_move_focus() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.focus, 16);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focus, 23);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.focus, 16);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.focus, 15);
    }

    #[test]
    fn test_focus_clamped_to_grid() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        for _ in 0..10 {
            press(&mut app, KeyCode::Up);
        }
        assert_eq!(app.focus, 0);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.focus, 0);
        for _ in 0..10 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.focus, GRID_CELLS - 1);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.focus, GRID_CELLS - 1);
    }

    #[test]
    fn test_enter_selects_focused_cell() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.fields().value, "2024-01-16");
        assert_eq!(app.fields().display, "January 16, 2024");
    }

    #[test]
    fn test_selection_closes_on_tick() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(app.picker.is_open());
        app.tick(Instant::now() + StdDuration::from_secs(1), d(2024, 1, 15));
        assert!(!app.picker.is_open());
    }

    #[test]
    fn test_bracket_keys_navigate() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.picker.title(), "February 2024");
        press(&mut app, KeyCode::Char('{'));
        assert_eq!(app.picker.title(), "February 2023");
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.picker.title(), "January 2023");
        press(&mut app, KeyCode::Char('}'));
        assert_eq!(app.picker.title(), "January 2024");
    }

    #[test]
    fn test_navigation_keys_ignored_when_closed() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.picker.title(), "January 2024");
    }

    #[test]
    fn test_q_returns_true() {
        let mut app = make_app();
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_ctrl_c_returns_true() {
        let mut app = make_app();
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!press(&mut app, KeyCode::Char('c')));
    }

    // ── render / mouse tests ──────────────────────────────────────────────────

    #[test]
    fn test_render_closed_shows_field_only() {
        let mut app = make_app();
        let screen = draw(&mut app, 40, 20);
        assert!(screen.contains("Date of birth"));
        assert!(screen.contains("Select a date"));
        assert!(screen.contains("date_of_birth="));
        assert!(!screen.contains("Su Mo Tu"));
        assert!(app.hits.dropdown.is_none());
    }

    #[test]
    fn test_render_open_shows_calendar() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        let screen = draw(&mut app, 40, 20);
        assert!(screen.contains("January 2024"));
        assert!(screen.contains("Su Mo Tu We Th Fr Sa"));
        assert_eq!(app.hits.cells.len(), GRID_CELLS);
        assert_eq!(app.hits.nav.len(), 4);
    }

    #[test]
    fn test_render_too_small_degrades() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        let screen = draw(&mut app, 20, 5);
        assert!(screen.contains("Terminal too small"));
        assert!(app.hits.cells.is_empty());
    }

    #[test]
    fn test_click_field_toggles() {
        let mut app = make_app();
        draw(&mut app, 40, 20);
        let field = app.hits.field;
        click(&mut app, field.x + 1, field.y + 1);
        assert!(app.picker.is_open());
        draw(&mut app, 40, 20);
        click(&mut app, field.x + 1, field.y + 1);
        assert!(!app.picker.is_open());
    }

    #[test]
    fn test_click_cell_selects_and_outside_dismisses() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        draw(&mut app, 40, 20);
        let cell = app.hits.cells[1];
        click(&mut app, cell.x, cell.y);
        assert_eq!(app.fields().value, "2024-01-01");

        let screen = draw(&mut app, 40, 20);
        assert!(screen.contains("January 1, 2024"));
        assert!(screen.contains("date_of_birth=2024-01-01"));
        assert!(app.picker.is_open());

        click(&mut app, 39, 19);
        assert!(!app.picker.is_open());
    }

    #[test]
    fn test_click_nav_buttons() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        draw(&mut app, 40, 20);
        let (nav, rect) = app.hits.nav[2];
        assert_eq!(nav, Navigation::NextMonth);
        click(&mut app, rect.x, rect.y);
        assert_eq!(app.picker.title(), "February 2024");

        draw(&mut app, 40, 20);
        let (_, rect) = app.hits.nav[0];
        click(&mut app, rect.x, rect.y);
        assert_eq!(app.picker.title(), "February 2023");
        assert!(app.picker.is_open());
    }

    #[test]
    fn test_click_dropdown_gap_keeps_open() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        draw(&mut app, 40, 20);
        let dropdown = app.hits.dropdown.unwrap();
        // bottom border row: inside the dropdown but not a cell
        click(&mut app, dropdown.x + 1, dropdown.y + dropdown.height - 1);
        assert!(app.picker.is_open());
        assert!(app.fields().value.is_empty());
    }
}
