pub mod convert;
pub mod currencies;
pub mod history;
pub mod setup;
pub mod tui;
pub mod ui;
