//! Interactive terminal UI for the PEI wizard.

pub mod app;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use pei_core::dashboard::Dashboard;
use pei_core::generator::PlanGenerator;

use crate::config::PeiConfig;
use app::App;

/// Launch the interactive wizard.
pub fn run_wizard(config: &PeiConfig, generator: Arc<dyn PlanGenerator>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let dashboard = if config.seed_dashboard {
        Dashboard::with_samples()
    } else {
        Dashboard::new()
    };
    tracing::info!(generator = generator.name(), "wizard started");
    let mut app = App::new(generator, config.simulator, dashboard, config.tick_rate);

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Wake up for the next simulator timer or the UI tick, whichever is first.
        if event::poll(app.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        let now = Instant::now();
        app.on_tick(now - last_tick);
        last_tick = now;

        if app.should_quit {
            return Ok(());
        }
    }
}
