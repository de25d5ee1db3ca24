// TUI event loop and terminal management
use crate::{App, AppCommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use headliner_core::ScreenEvent;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

/// How long to wait for a key before checking on background work
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the app until the user quits.
///
/// `events` is the receiving end of the channel the app's screens were
/// built with. Everything arriving on it is applied here, between frames,
/// so list state is only ever touched from this loop.
pub async fn run_tui(
    mut app: App,
    mut events: UnboundedReceiver<ScreenEvent>,
    refresh_every: Duration,
) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start(refresh_every);
    let result = event_loop(&mut terminal, &mut app, &mut events);

    // Restore terminal even if the loop bailed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut UnboundedReceiver<ScreenEvent>,
) -> anyhow::Result<()> {
    loop {
        while let Ok(screen_event) = events.try_recv() {
            app.handle_screen_event(screen_event);
        }

        terminal.draw(|f| crate::ui::render(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = app.handle_key(key.code) {
                        run_command(app, command);
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn run_command(app: &mut App, command: AppCommand) {
    match command {
        AppCommand::OpenPage(url) => {
            debug!("Opening {}", url);
            if let Err(e) = open::that(url.as_str()) {
                warn!("Failed to open browser: {}", e);
                app.error_message = Some(format!("Failed to open browser: {}", e));
            }
        }
    }
}
