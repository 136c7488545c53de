//! StudyGuard - Pomodoro study-session timer.
//!
//! # Commands
//!
//! - `studyguard run`: Start the interactive timer
//! - `studyguard tasks`: List tasks
//! - `studyguard add NAME [--type T]`: Add a task
//! - `studyguard done NAME [--session N] [--undo]`: Mark a task complete or incomplete
//!
//! # Environment Variables
//!
//! See the [`config`](studyguard_client::config) module for available
//! configuration options.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use studyguard_client::api::ApiClient;
use studyguard_client::config::Config;
use studyguard_client::runtime::Runtime;
use studyguard_client::tasks;
use studyguard_client::tui::{
    install_panic_hook, ui, Command as ViewCommand, EventHandler, Tui, TuiEvent, ViewState,
};
use studyguard_client::types::{ResponseStatus, TaskType};

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Capacity of the terminal event channel.
const TUI_EVENT_CAPACITY: usize = 100;

/// StudyGuard - Pomodoro study-session timer.
///
/// Runs work/break cycles while the StudyGuard service watches for
/// drowsiness, and keeps your study tasks on that service.
#[derive(Parser, Debug)]
#[command(name = "studyguard")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    STUDYGUARD_SERVER_URL            Service URL (default: http://127.0.0.1:5000)
    STUDYGUARD_WORK_SECS             Work phase length (default: 1500)
    STUDYGUARD_BREAK_SECS            Break phase length (default: 300)
    STUDYGUARD_QUOTE_POLL_MS         Quote poll period (default: 1000)
    STUDYGUARD_SUGGESTION_POLL_MS    Break suggestion poll period (default: 5000)
    STUDYGUARD_REQUEST_TIMEOUT_SECS  HTTP timeout (default: 10)
    STUDYGUARD_LOG_FILE              Log file for the interactive view

EXAMPLES:
    # Start the timer
    studyguard run

    # Add a reading task and complete it in session 2
    studyguard add \"Read Ch.1\" --type reading
    studyguard done \"Read Ch.1\" --session 2
")]
struct Cli {
    /// Service URL, overriding STUDYGUARD_SERVER_URL.
    #[arg(long, global = true)]
    server_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive timer.
    Run,

    /// List all tasks.
    Tasks,

    /// Add a task (an existing task with the same name is replaced).
    Add {
        /// Task name.
        name: String,

        /// Task type: reading, writing, problem_solving, memorization or research.
        #[arg(short = 't', long = "type", default_value = "reading")]
        task_type: TaskType,
    },

    /// Mark a task complete.
    Done {
        /// Task name.
        name: String,

        /// Session the task was completed in.
        #[arg(short, long, default_value_t = 1)]
        session: u32,

        /// Mark the task incomplete instead.
        #[arg(long)]
        undo: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.server_url {
        config = config.with_server_url(url);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    if let Command::Run = cli.command {
        init_tui_logging(&config)?;
        return runtime.block_on(run_tui(config));
    }

    init_logging();
    let api = ApiClient::new(&config.server_url, config.request_timeout)
        .context("Failed to create HTTP client")?;
    runtime.block_on(async {
        match cli.command {
            Command::Tasks => print_tasks(&api).await,
            Command::Add { name, task_type } => add_task(&api, &name, task_type).await,
            Command::Done {
                name,
                session,
                undo,
            } => complete_task(&api, &name, session, !undo).await,
            Command::Run => Ok(()),
        }
    })
}

/// Runs the interactive timer until the user quits.
async fn run_tui(config: Config) -> Result<()> {
    info!(server_url = %config.server_url, "Starting StudyGuard");

    let mut runtime = Runtime::new(config).context("Failed to create HTTP client")?;

    install_panic_hook();
    let mut tui = Tui::new().context("Failed to initialize terminal")?;

    let (tui_tx, mut tui_rx) = mpsc::channel::<TuiEvent>(TUI_EVENT_CAPACITY);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let input_task = tokio::spawn(EventHandler::new(tui_tx, shutdown_rx).run());

    runtime.boot();
    let mut view = ViewState::new();

    loop {
        tokio::select! {
            _ = wait_for_shutdown() => {
                info!("Shutdown signal received");
                break;
            }

            Some(event) = tui_rx.recv() => match event {
                TuiEvent::Render | TuiEvent::Resize(..) => {
                    tui.draw(|frame| ui::render(frame, runtime.state(), &view))?;
                }
                TuiEvent::Key(key) => {
                    match view.on_key(key, runtime.state().tasks().tasks()) {
                        Some(ViewCommand::Quit) => break,
                        Some(ViewCommand::Dispatch(event)) => runtime.dispatch(event),
                        None => {}
                    }
                }
            },

            Some(event) = runtime.next_event() => {
                runtime.dispatch(event);
                if runtime.take_input_clear() {
                    view.clear_input();
                }
                view.clamp_selection(runtime.state().tasks().len());
            }
        }
    }

    info!("Shutting down...");
    let _ = shutdown_tx.send(());
    runtime
        .shutdown(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS))
        .await;

    tui.restore().context("Failed to restore terminal")?;
    match input_task.await {
        Ok(Err(e)) => error!(error = %e, "Input handler failed"),
        Err(e) => error!(error = %e, "Input handler panicked"),
        Ok(Ok(())) => {}
    }

    info!("StudyGuard stopped");
    Ok(())
}

/// Prints every task with its completion label.
async fn print_tasks(api: &ApiClient) -> Result<()> {
    let list = tasks::list(api).await.context("Failed to list tasks")?;
    if list.is_empty() {
        println!("No tasks yet.");
    }
    for (name, record) in &list {
        let checkbox = if record.completed { "[x]" } else { "[ ]" };
        match record.completion_label() {
            Some(label) => println!("{checkbox} {name} ({}) - {label}", record.task_type.label()),
            None => println!("{checkbox} {name} ({})", record.task_type.label()),
        }
    }
    Ok(())
}

async fn add_task(api: &ApiClient, name: &str, task_type: TaskType) -> Result<()> {
    let name = tasks::create(api, name, task_type)
        .await
        .context("Failed to add task")?;
    println!("Added task \"{name}\" ({})", task_type.label());
    Ok(())
}

async fn complete_task(api: &ApiClient, name: &str, session: u32, completed: bool) -> Result<()> {
    let response = tasks::set_completed(api, name, completed, session)
        .await
        .context("Failed to update task")?;
    if response.status != ResponseStatus::Success {
        bail!("The service could not update task \"{name}\"");
    }
    match response.completed_in_session {
        Some(n) => println!("{}", tasks::completion_notice(name, n)),
        None => println!("Task \"{name}\" marked incomplete"),
    }
    Ok(())
}

/// Logging for headless commands goes to stderr.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Logging for the interactive view must never reach the screen: it goes to
/// `STUDYGUARD_LOG_FILE` when set and is discarded otherwise.
fn init_tui_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false);

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
