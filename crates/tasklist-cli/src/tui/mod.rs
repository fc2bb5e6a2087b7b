//! Terminal user interface for the task list.
//!
//! ## Entry points
//!
//! - [`run_tui`]: full-screen list over a fresh store.

pub mod input;
pub mod list;

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tasklist_core::TaskStore;
use tasklist_core::config::TuiConfig;
use tracing::subscriber::NoSubscriber;

use list::ListView;

/// Raw mode plus alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("create terminal")?;
        terminal.hide_cursor().context("hide cursor")?;
        terminal.clear().context("clear terminal")?;
        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the interactive list until the user quits.
///
/// Logging is silenced while the alternate screen is up.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or an I/O error occurs
/// while drawing or reading events.
pub fn run_tui(store: TaskStore, config: &TuiConfig) -> anyhow::Result<()> {
    tracing::info!(tasks = store.len(), "starting tui");
    let view = ListView::new(store, Duration::from_millis(config.status_ttl_ms));
    let tick_rate = Duration::from_millis(config.tick_ms.max(1));

    let mut guard = TerminalGuard::enter()?;
    tracing::subscriber::with_default(NoSubscriber::default(), || {
        event_loop(guard.terminal_mut(), view, tick_rate)
    })
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut view: ListView,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| view.render(frame, frame.area()))?;
        if view.should_quit() {
            break;
        }

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            // Resize is picked up by the next draw.
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                view.handle_key(key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            view.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
