//! Full-screen interactive converter.

pub mod app;
pub mod render;

use crate::core::config::DefaultsConfig;
use crate::core::conversion::{self, ConversionOutcome, Generation};
use crate::core::{ConversionError, CurrencyDataProvider, CurrencyDirectory};
use anyhow::{Context, Result};
use app::{Action, App};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

type Completion = (Generation, Result<ConversionOutcome, ConversionError>);

/// Puts the terminal back the way it was, even if the loop bails out early.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(TerminalGuard { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "Failed to disable raw mode");
        }
        if let Err(e) = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        ) {
            warn!(error = %e, "Failed to restore terminal");
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Spawns one background conversion; its result comes back through `tx`.
fn dispatch(
    app: &mut App,
    provider: &Arc<dyn CurrencyDataProvider>,
    tx: &UnboundedSender<Completion>,
) {
    let (generation, request) = app.begin_conversion();
    let directory = Arc::clone(&app.directory);
    let provider = Arc::clone(provider);
    let tx = tx.clone();
    tokio::spawn(async move {
        let today = chrono::Local::now().date_naive();
        let result = conversion::convert(&directory, provider.as_ref(), &request, today).await;
        // the receiver only goes away when the UI has exited
        let _ = tx.send((generation, result));
    });
}

pub async fn run(
    directory: Arc<CurrencyDirectory>,
    provider: Arc<dyn CurrencyDataProvider>,
    defaults: &DefaultsConfig,
) -> Result<()> {
    info!(currencies = directory.len(), "Starting interactive converter");
    let mut app = App::new(directory, defaults);
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    let mut guard = TerminalGuard::enter()?;
    let mut events = EventStream::new();

    dispatch(&mut app, &provider, &tx);
    let mut dirty = true;

    loop {
        if dirty {
            guard.terminal.draw(|f| render::draw(f, &mut app))?;
            dirty = false;
        }

        tokio::select! {
            event = events.next() => {
                let action = match event {
                    Some(Ok(Event::Key(key))) => app.handle_key(key),
                    Some(Ok(Event::Mouse(mouse))) => app.handle_mouse(mouse),
                    Some(Ok(Event::Resize(..))) => {
                        // anchors were computed for the old layout
                        app.tooltip.hide();
                        Action::Redraw
                    }
                    Some(Ok(_)) => Action::None,
                    Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                    None => Action::Quit,
                };
                match action {
                    Action::None => {}
                    Action::Redraw => dirty = true,
                    Action::Convert => {
                        dispatch(&mut app, &provider, &tx);
                        dirty = true;
                    }
                    Action::Quit => break,
                }
            }
            Some((generation, result)) = rx.recv() => {
                app.finish_conversion(generation, result);
                dirty = true;
            }
        }
    }

    debug!("Leaving interactive converter");
    Ok(())
}
