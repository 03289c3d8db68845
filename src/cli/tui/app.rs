//! State of the interactive converter and the handlers that mutate it.

use crate::core::amount;
use crate::core::chart::{ChartModel, PlotArea, Redraw, Tolerance, Tooltip};
use crate::core::config::DefaultsConfig;
use crate::core::conversion::{ConversionOutcome, ConversionRequest, Generation, RequestTracker};
use crate::core::{ConversionError, CurrencyDirectory};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;
use std::sync::Arc;
use tracing::debug;

/// What the event loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    Convert,
    Quit,
}

impl From<Redraw> for Action {
    fn from(redraw: Redraw) -> Self {
        match redraw {
            Redraw::Needed => Action::Redraw,
            Redraw::Skip => Action::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    From,
    To,
    Amount,
    Convert,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::From => Focus::To,
            Focus::To => Focus::Amount,
            Focus::Amount => Focus::Convert,
            Focus::Convert => Focus::From,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::From => Focus::Convert,
            Focus::To => Focus::From,
            Focus::Amount => Focus::To,
            Focus::Convert => Focus::Amount,
        }
    }
}

/// A searchable list of currency names.
#[derive(Debug, Default)]
pub struct Selector {
    pub state: ListState,
    pub query: String,
}

impl Selector {
    fn new(selected: usize) -> Self {
        Selector {
            state: ListState::default().with_selected(Some(selected)),
            query: String::new(),
        }
    }

    pub fn selected(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    fn select(&mut self, index: usize, len: usize) {
        if len > 0 {
            self.state.select(Some(index.min(len - 1)));
        }
    }

    fn step(&mut self, delta: isize, len: usize) {
        self.query.clear();
        let target = self.selected().saturating_add_signed(delta);
        self.select(target, len);
    }
}

/// Screen regions recorded while drawing, used to route mouse events.
#[derive(Debug, Default, Clone, Copy)]
pub struct Regions {
    pub from_list: Rect,
    pub to_list: Rect,
    pub amount: Rect,
    pub convert_button: Rect,
    pub plot: PlotArea,
}

pub struct App {
    pub directory: Arc<CurrencyDirectory>,
    pub from: Selector,
    pub to: Selector,
    pub amount: String,
    pub focus: Focus,
    pub output: String,
    pub chart: Option<ChartModel>,
    pub tooltip: Tooltip,
    pub tolerance: Tolerance,
    pub regions: Regions,
    pub in_flight: usize,
    requests: RequestTracker,
}

impl App {
    pub fn new(directory: Arc<CurrencyDirectory>, defaults: &DefaultsConfig) -> Self {
        let last = directory.len().saturating_sub(1);
        let from = directory.position(&defaults.from).unwrap_or(0);
        let to = directory.position(&defaults.to).unwrap_or(1.min(last));
        App {
            directory,
            from: Selector::new(from),
            to: Selector::new(to),
            amount: defaults.amount.clone(),
            focus: Focus::Amount,
            output: String::new(),
            chart: None,
            tooltip: Tooltip::default(),
            tolerance: Tolerance::default(),
            regions: Regions::default(),
            in_flight: 0,
            requests: RequestTracker::new(),
        }
    }

    pub fn conversion_request(&self) -> ConversionRequest {
        let name = |selector: &Selector| {
            self.directory
                .names()
                .get(selector.selected())
                .cloned()
                .unwrap_or_default()
        };
        ConversionRequest {
            from: name(&self.from),
            to: name(&self.to),
            amount: self.amount.clone(),
        }
    }

    /// Registers a new conversion and returns what the background task needs.
    pub fn begin_conversion(&mut self) -> (Generation, ConversionRequest) {
        let generation = self.requests.dispatch();
        self.in_flight += 1;
        let request = self.conversion_request();
        debug!(?generation, ?request, "Dispatching conversion");
        (generation, request)
    }

    /// Applies a finished conversion unless a newer one has been dispatched
    /// since. Returns whether the result was applied.
    pub fn finish_conversion(
        &mut self,
        generation: Generation,
        result: Result<ConversionOutcome, ConversionError>,
    ) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !self.requests.is_current(generation) {
            debug!(?generation, "Discarding stale conversion result");
            return false;
        }

        match result {
            Ok(outcome) => {
                self.output = outcome.display;
                self.chart = Some(ChartModel::new(outcome.series));
                self.tooltip.hide();
            }
            Err(err) => {
                debug!(error = %err, "Conversion failed");
                self.output = err.user_message().to_string();
            }
        }
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Action::Quit;
            }
            KeyCode::Enter => return Action::Convert,
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Action::Redraw;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return Action::Redraw;
            }
            _ => {}
        }

        let len = self.directory.len();
        match self.focus {
            Focus::From | Focus::To => {
                let directory = Arc::clone(&self.directory);
                let selector = match self.focus {
                    Focus::From => &mut self.from,
                    _ => &mut self.to,
                };
                match key.code {
                    KeyCode::Up => selector.step(-1, len),
                    KeyCode::Down => selector.step(1, len),
                    KeyCode::PageUp => selector.step(-10, len),
                    KeyCode::PageDown => selector.step(10, len),
                    KeyCode::Home => selector.step(isize::MIN, len),
                    KeyCode::End => selector.step(isize::MAX, len),
                    KeyCode::Char(c) => {
                        selector.query.push(c);
                        if let Some(index) = directory.search(&selector.query) {
                            selector.select(index, len);
                        }
                    }
                    KeyCode::Backspace => {
                        selector.query.pop();
                        if !selector.query.is_empty() {
                            if let Some(index) = directory.search(&selector.query) {
                                selector.select(index, len);
                            }
                        }
                    }
                    _ => return Action::None,
                }
                Action::Redraw
            }
            Focus::Amount => match key.code {
                KeyCode::Char(c) if amount::accepts_char(&self.amount, c) => {
                    self.amount.push(c);
                    Action::Redraw
                }
                KeyCode::Backspace => {
                    self.amount.pop();
                    Action::Redraw
                }
                _ => Action::None,
            },
            Focus::Convert => match key.code {
                KeyCode::Char(' ') => Action::Convert,
                _ => Action::None,
            },
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) -> Action {
        let position = Position::new(event.column, event.row);
        match event.kind {
            MouseEventKind::Moved => match &self.chart {
                Some(chart) => self
                    .tooltip
                    .on_pointer_move(
                        chart,
                        &self.regions.plot,
                        event.column,
                        event.row,
                        self.tolerance,
                    )
                    .into(),
                None => Action::None,
            },
            MouseEventKind::Down(MouseButton::Left) => {
                if self.regions.convert_button.contains(position) {
                    self.focus = Focus::Convert;
                    Action::Convert
                } else if self.regions.amount.contains(position) {
                    self.focus = Focus::Amount;
                    Action::Redraw
                } else if self.regions.from_list.contains(position) {
                    self.focus = Focus::From;
                    let area = self.regions.from_list;
                    click_select(&mut self.from, area, event.row, self.directory.len());
                    Action::Redraw
                } else if self.regions.to_list.contains(position) {
                    self.focus = Focus::To;
                    let area = self.regions.to_list;
                    click_select(&mut self.to, area, event.row, self.directory.len());
                    Action::Redraw
                } else {
                    Action::None
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let delta = if event.kind == MouseEventKind::ScrollUp { -1 } else { 1 };
                let len = self.directory.len();
                if self.regions.from_list.contains(position) {
                    self.from.step(delta, len);
                    Action::Redraw
                } else if self.regions.to_list.contains(position) {
                    self.to.step(delta, len);
                    Action::Redraw
                } else {
                    Action::None
                }
            }
            _ => Action::None,
        }
    }
}

/// Selects the list row under the pointer; `area` is the bordered list.
fn click_select(selector: &mut Selector, area: Rect, row: u16, len: usize) {
    let first_row = area.y + 1;
    if row < first_row || row >= area.y + area.height.saturating_sub(1) {
        return;
    }
    selector.query.clear();
    let index = selector.state.offset() + usize::from(row - first_row);
    if index < len {
        selector.select(index, len);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::currency::tests::{brl, eur, usd};
    use crate::core::error::FetchError;
    use crate::core::timeseries::{RatePoint, TimeSeries};
    use chrono::NaiveDate;

    pub(crate) fn app() -> App {
        let directory = Arc::new(CurrencyDirectory::new(vec![usd(), eur(), brl()]));
        App::new(directory, &DefaultsConfig::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub(crate) fn outcome(display: &str) -> ConversionOutcome {
        ConversionOutcome {
            from_code: "USD".into(),
            to_code: "EUR".into(),
            display: display.into(),
            series: TimeSeries::new(vec![
                RatePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    rate: 0.90,
                },
                RatePoint {
                    date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    rate: 0.92,
                },
            ]),
        }
    }

    #[test]
    fn test_defaults_select_configured_pair() {
        let app = app();
        let request = app.conversion_request();
        assert_eq!(request.from, "US Dollar");
        assert_eq!(request.to, "Brazilian Real");
        assert_eq!(request.amount, "1");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut app = app();
        let (first, _) = app.begin_conversion();
        let (second, _) = app.begin_conversion();
        assert_eq!(app.in_flight, 2);

        assert!(app.finish_conversion(second, Ok(outcome("92.50 €"))));
        assert!(!app.finish_conversion(first, Ok(outcome("80.00 €"))));

        assert_eq!(app.output, "92.50 €");
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn test_failure_keeps_previous_chart() {
        let mut app = app();
        let (generation, _) = app.begin_conversion();
        app.finish_conversion(generation, Ok(outcome("92.50 €")));
        let chart = app.chart.clone();

        let (generation, _) = app.begin_conversion();
        app.finish_conversion(
            generation,
            Err(ConversionError::InvalidAmount("abc".into())),
        );

        assert_eq!(app.output, "ERROR: invalid currency or number.");
        assert_eq!(app.chart, chart);

        let (generation, _) = app.begin_conversion();
        app.finish_conversion(
            generation,
            Err(ConversionError::Fetch(FetchError::Network("timed out".into()))),
        );
        assert_eq!(app.output, "ERROR: could not reach the currency service.");
    }

    #[test]
    fn test_amount_field_filters_input() {
        let mut app = app();
        app.amount.clear();
        for c in ['1', 'x', ',', '5', '.', '-'] {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.amount, "1,5");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::Convert);
    }

    #[test]
    fn test_selector_search_and_navigation() {
        let mut app = app();
        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::From);

        for c in "eur".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.conversion_request().from, "Euro");

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.conversion_request().from, "Brazilian Real");
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.conversion_request().from, "Brazilian Real");
        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.conversion_request().from, "US Dollar");
    }

    #[test]
    fn test_escape_quits() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::Quit);
    }
}
