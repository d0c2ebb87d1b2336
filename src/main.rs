use std::io::{self, stdout, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use tracing::{debug, info};

use neurotask::api::{ApiClient, TaskApi};
use neurotask::app::{state_channel, LogicThread};
use neurotask::config::Config;
use neurotask::core::TaskStatus;
use neurotask::render::{RenderState, FRAME_DURATION};
use neurotask::tea::Model;
use neurotask::{ui, Result};

/// NeuroTask - terminal client for the NeuroTask AI task service
#[derive(Parser, Debug)]
#[command(name = "neurotask")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    NEUROTASK_DEBUG=1     Enable debug logging (alternative to --debug)\n    RUST_LOG              Override the log filter"
)]
pub struct Cli {
    /// Service base URL (overrides ~/.neurotask/config.toml)
    #[arg(short = 'u', long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Enable debug logging (writes to ~/.neurotask/neurotask.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Headless commands; each prints JSON to stdout
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List tasks, optionally only those with one status
    List {
        /// pending, in_progress, completed or canceled
        #[arg(long, short = 's')]
        status: Option<TaskStatus>,
    },

    /// AI summary of pending tasks
    Summary,

    /// AI priority suggestions for pending tasks
    Priorities,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let _log_guard = neurotask::log::init_with_debug(cli.debug);

    let config = Config::load()?.with_base_url(cli.base_url.clone());
    let api = ApiClient::new(config.effective_base_url())?;

    if let Some(command) = cli.command {
        return run_headless(command, api);
    }

    info!(base_url = %api.base_url(), "NeuroTask starting");

    let model = Model::new(api.base_url().as_str());
    let api: Arc<dyn TaskApi> = Arc::new(api);

    let shutdown = Arc::new(AtomicBool::new(false));
    let (publisher, state_rx) = state_channel();

    let shutdown_clone = shutdown.clone();
    let logic_handle =
        thread::spawn(move || LogicThread::run(model, api, publisher, shutdown_clone));

    let mut terminal = setup_terminal()?;
    let result = render_loop(&mut terminal, state_rx, &shutdown);

    shutdown.store(true, Ordering::SeqCst);
    let logic_result = logic_handle.join();
    restore_terminal(&mut terminal)?;

    match logic_result {
        Ok(Err(e)) => {
            eprintln!("Error: {e}");
            Err(e)
        }
        _ => result,
    }
}

/// Run one request against the service and print the response body.
fn run_headless(command: Command, api: ApiClient) -> Result<()> {
    debug!(?command, "Running headless command");
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        match command {
            Command::List { status } => print_json(&api.list_tasks_by_status(status).await?),
            Command::Summary => print_json(&api.summarize_pending().await?),
            Command::Priorities => print_json(&api.suggest_priorities().await?),
        }
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: Receiver<RenderState>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut state = RenderState::default();
    let mut last_version: u64 = 0;
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match state_rx.try_recv() {
            Ok(s) => {
                dirty = dirty || s.version != last_version;
                state = s;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        if last_frame.elapsed() < FRAME_DURATION {
            thread::sleep(Duration::from_micros(500));
            continue;
        }
        last_frame = Instant::now();

        if dirty {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_version = state.version;
            dirty = false;
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(disable_raw_mode()?)
}
