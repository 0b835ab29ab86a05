//! Command-line storefront driver.
//!
//! Runs one session against the live catalog API. Commands are read line by
//! line from stdin (see [`skiphire::ui::input`]) and the screen is printed
//! after every change, as text or as JSON with `--json`.
//!
//! # Threads
//!
//! ```text
//! ┌──────────────┐   Event    ┌──────────────────┐  WorkerMessage  ┌──────────────────┐
//! │ stdin reader │ ─────────▶ │    event loop    │ ──────────────▶ │  catalog worker  │
//! └──────────────┘            │ (owns AppState)  │ ◀────────────── │ (HTTP + cache)   │
//!                             └──────────────────┘  Event::Worker  └──────────────────┘
//! ```

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use skiphire::worker::{CatalogWorker, WorkerHandle};
use skiphire::{handle_event, Action, AppState, Config, Event, Result};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

#[derive(Debug, Parser)]
#[command(name = "skiphire", version, about = "Browse, filter and select skips for a location")]
struct Cli {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Postcode to search, overriding the config.
    #[arg(long)]
    postcode: Option<String>,

    /// Area to search, overriding the config.
    #[arg(long)]
    area: Option<String>,

    /// Catalog API base URL, overriding the config.
    #[arg(long)]
    base_url: Option<String>,

    /// Print each screen as a JSON view model instead of text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(postcode) = &self.postcode {
            config.postcode.clone_from(postcode);
        }
        if let Some(area) = &self.area {
            config.area.clone_from(area);
        }
        if let Some(base_url) = &self.base_url {
            config.api_base_url.clone_from(base_url);
        }

        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("skiphire: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;

    let provider = match skiphire::observability::init_tracing(&config, &config.data_dir()) {
        Ok(provider) => Some(provider),
        Err(e) => {
            eprintln!("skiphire: tracing disabled: {e}");
            None
        }
    };

    let span = tracing::info_span!("session", location = %config.location_key()?);
    let _guard = span.enter();

    let mut state = skiphire::initialize(&config)?;
    let (events, inbox) = mpsc::channel::<Event>();

    let worker = CatalogWorker::new(skiphire::http_catalog_client(&config)?);
    let worker_events = events.clone();
    let handle = WorkerHandle::spawn(worker, move |response| {
        // The loop may already have exited; nothing left to deliver to.
        let _ = worker_events.send(Event::WorkerResponse(response));
    })?;

    spawn_stdin_reader(events.clone())?;

    if events.send(Event::Mount).is_ok() {
        tracing::debug!("session mounted");
    }
    drop(events);

    for event in inbox {
        let (should_render, actions) = match handle_event(&mut state, &event) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                eprintln!("skiphire: {e}");
                continue;
            }
        };

        tracing::debug!(action_count = actions.len(), should_render, "event handled");

        let mut keep_running = true;
        for action in actions {
            keep_running &= execute_action(&handle, &action);
        }

        if should_render {
            print_screen(&state, cli.json);
        }
        if !keep_running {
            break;
        }
    }

    drop(handle);
    if let Some(provider) = provider {
        skiphire::observability::shutdown_tracing(&provider);
    }
    Ok(())
}

/// Runs one action. Returns `false` when the session should end.
fn execute_action(worker: &WorkerHandle, action: &Action) -> bool {
    match action {
        Action::PostToWorker(message) => {
            if let Err(e) = worker.post(message.clone()) {
                tracing::error!(error = %e, "failed to post to catalog worker");
                eprintln!("skiphire: {e}");
            }
            true
        }
        Action::ProceedToPermitCheck {
            skip_id,
            size,
            total_price,
        } => {
            println!(
                "Selected {size} yard skip (#{skip_id}) for {}. Continuing to permit check.",
                skiphire::ui::viewmodel::format_pounds(*total_price)
            );
            false
        }
        Action::Close => false,
    }
}

fn print_screen(state: &AppState, json: bool) {
    let vm = state.compute_viewmodel();
    if json {
        match serde_json::to_string(&vm) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "failed to serialize view model"),
        }
    } else {
        println!("{}", skiphire::ui::render(&vm));
    }
}

/// Forwards parsed stdin commands; end of input closes the session.
fn spawn_stdin_reader(events: Sender<Event>) -> Result<()> {
    std::thread::Builder::new()
        .name("skiphire-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match skiphire::ui::parse_command(&line) {
                    Ok(Some(event)) => {
                        if events.send(event).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => eprintln!("{message}"),
                }
            }
            let _ = events.send(Event::Close);
        })?;
    Ok(())
}
