pub mod app;
pub mod event;
mod views;
mod widgets;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout},
    DefaultTerminal, Frame,
};
use tokio::sync::mpsc;
use vectorweb_core::backend::HttpSearchBackend;
use vectorweb_core::clipboard::SystemClipboard;
use vectorweb_core::config::VectorWebConfig;
use vectorweb_core::model::SearchOutcome;
use vectorweb_core::orchestrator::Orchestrator;
use vectorweb_core::probe;

use self::app::{App, InputMode};
use self::event::{AsyncAction, AsyncResult};
use self::widgets::{header::Header, help_bar::HelpBar, text_input::TextInput};

/// Entry point for the interactive TUI mode.
pub async fn run_tui(
    config: &VectorWebConfig,
    url: Option<String>,
    query: Option<String>,
) -> Result<()> {
    let backend =
        HttpSearchBackend::from_config(&config.service).context("failed to create search client")?;
    let orchestrator = Arc::new(Orchestrator::from_config(backend, config));

    // Channels for async communication
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AsyncAction>();
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<AsyncResult>();

    tokio::spawn(async move {
        worker_loop(orchestrator, &mut action_rx, &result_tx).await;
    });

    let clipboard = SystemClipboard::detect();
    tracing::info!(clipboard = %clipboard.describe(), "tui started");

    let mut app = App::new(config, url, query, Arc::new(clipboard));
    if let Some(action) = app.startup() {
        action_tx.send(action)?;
    }

    let mut terminal = ratatui::init();

    let result = run_loop(
        &mut terminal,
        &mut app,
        &action_tx,
        &mut result_rx,
        config.ui.tick(),
    );

    ratatui::restore();

    result
}

fn run_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    action_tx: &mpsc::UnboundedSender<AsyncAction>,
    result_rx: &mut mpsc::UnboundedReceiver<AsyncResult>,
    tick: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        // Poll for async results (non-blocking)
        while let Ok(result) = result_rx.try_recv() {
            app.handle_result(result);
        }

        if ct_event::poll(tick)? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        let _ = action_tx.send(action);
                    }
                }
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let [header, url, query, body, help] = Layout::vertical([
        Constraint::Length(2), // header
        Constraint::Length(3), // url input
        Constraint::Length(3), // query input
        Constraint::Min(6),    // body
        Constraint::Length(1), // help bar
    ])
    .areas(area);

    frame.render_widget(
        Header {
            status: app.session.status(),
        },
        header,
    );

    frame.render_widget(
        TextInput {
            label: "Target URL",
            placeholder: "https://example.com/article",
            field: &app.url,
            focused: app.input_mode == InputMode::Url,
        },
        url,
    );
    frame.render_widget(
        TextInput {
            label: "Search Query",
            placeholder: "e.g. What are the key benefits mentioned?",
            field: &app.query,
            focused: app.input_mode == InputMode::Query,
        },
        query,
    );

    match app.session.presenter().outcome() {
        None => views::home::render(frame, body),
        Some(SearchOutcome::Pending) => views::results::render_pending(frame, body),
        Some(SearchOutcome::Failure(message)) => {
            views::results::render_failure(frame, message, body)
        }
        Some(SearchOutcome::Success(set)) => views::results::render_table(frame, app, set, body),
    }

    frame.render_widget(
        HelpBar {
            input_mode: app.input_mode,
            detail_open: app.detail_open(),
            has_results: app.results_len() > 0,
        },
        help,
    );

    if app.detail_open() {
        views::detail::render(frame, app, area);
    }
}

/// Async worker loop. Each action runs on its own task, so a new search is
/// never queued behind one still in flight.
async fn worker_loop(
    orchestrator: Arc<Orchestrator<HttpSearchBackend>>,
    action_rx: &mut mpsc::UnboundedReceiver<AsyncAction>,
    result_tx: &mpsc::UnboundedSender<AsyncResult>,
) {
    while let Some(action) = action_rx.recv().await {
        let orchestrator = Arc::clone(&orchestrator);
        let result_tx = result_tx.clone();
        tokio::spawn(async move {
            let result = match action {
                AsyncAction::Probe => AsyncResult::Probe(probe::probe(orchestrator.backend()).await),
                AsyncAction::Search(pending) => {
                    let resolution = orchestrator
                        .execute(&pending.request, pending.status)
                        .await;
                    AsyncResult::Search {
                        ticket: pending.ticket,
                        resolution,
                    }
                }
            };
            // UI closed
            let _ = result_tx.send(result);
        });
    }
}
