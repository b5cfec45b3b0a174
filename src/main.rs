use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use studybot::ai::{ChatBackend, OpenRouterClient};
use studybot::app::App;
use studybot::config::{Cli, Config};
use studybot::models::AppEvent;
use studybot::{input, logger, ui};
use tokio::sync::mpsc;

const TICK: Duration = Duration::from_millis(100);

fn build_backend(config: &Config) -> Option<Arc<dyn ChatBackend>> {
    if !config.has_api_key() {
        logger::log("No API key found; AI features are disabled");
        return None;
    }
    match OpenRouterClient::new(config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            logger::log(&format!("Failed to create the AI client: {}", e));
            None
        }
    }
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut keys = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            _ = tick.tick() => {}
            Some(event) = events.recv() => app.handle_event(event),
            maybe_event = keys.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    if !input::handle_key(app, key) {
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read terminal events"),
                None => return Ok(()),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    logger::init(&config.log_file);
    logger::log(&format!("Starting studybot with model {}", config.model));

    let preload = cli
        .context_file
        .as_ref()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read context file {}", path.display()))
        })
        .transpose()?;

    let backend = build_backend(&config);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(config, backend, tx);
    if let Some(context) = preload {
        app.submit_context(context.trim().to_string());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    logger::log("Shutting down");
    result
}
