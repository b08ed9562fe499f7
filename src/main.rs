//! StudyHub interactive shell.
//!
//! Opens the configured store and renders the current view after every
//! state change. Commands are read line by line from standard input.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt};

use studyhub_core::config::{AppConfig, LogFormat};
use studyhub_core::error::AppError;
use studyhub_core::types::{FileId, FolderId, LessonId, TopicId};
use studyhub_service::StudyHub;
use studyhub_view::NotificationLevel;

const HELP: &str = "\
Commands:
  home                 show the dashboard
  folder N             open folder N
  topic N              open topic N
  lesson N             open lesson N
  search QUERY         search everything
  preview N            preview file N of the open lesson
  close                close the preview
  upload PATH          upload a PDF or Word document to the open lesson
  save N [DIR]         save file N into DIR (default: current directory)
  back                 go one level up
  reload               re-read the store
  help                 show this help
  quit                 leave the shell";

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Shell error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    if let Ok(path) = std::env::var("STUDYHUB_CONFIG") {
        return AppConfig::load_from(std::path::Path::new(&path));
    }
    let env = std::env::var("STUDYHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging on stderr so it does not mix with the views
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Compact => {
            fmt()
                .compact()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Prints the current view and any notifications not shown yet.
struct Renderer {
    hub: Weak<StudyHub>,
    seen: AtomicUsize,
}

impl Renderer {
    fn render(&self) {
        if let Some(hub) = self.hub.upgrade() {
            println!("\n{}", hub.current_view());
            if let Some(handle) = hub.active_handle() {
                println!("  [{} bytes at {}]", handle.len(), handle.uri());
            }
        }
        self.flush_notifications();
    }

    fn flush_notifications(&self) {
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        let total = hub.notifications().history_len();
        let fresh = total.saturating_sub(self.seen.swap(total, Ordering::SeqCst));
        let active = hub.notifications().active();
        let start = active.len().saturating_sub(fresh);
        for notification in &active[start..] {
            let marker = match notification.level {
                NotificationLevel::Info => "ℹ",
                NotificationLevel::Success => "✓",
                NotificationLevel::Error => "✗",
            };
            println!("{marker} {}", notification.message);
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting StudyHub v{}", env!("CARGO_PKG_VERSION"));

    let hub = Arc::new(StudyHub::open(config).await?);
    let renderer = Arc::new(Renderer {
        hub: Arc::downgrade(&hub),
        seen: AtomicUsize::new(0),
    });
    let listener = Arc::clone(&renderer);
    let _subscription = hub.subscribe(move |_| listener.render());

    println!("StudyHub. Type 'help' for commands.");
    renderer.render();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        let errors_before = hub.notifications().error_count();
        match execute(&hub, command, arg).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Command failed");
                if hub.notifications().error_count() == errors_before {
                    hub.notifications().error(e.message);
                }
            }
        }
        renderer.flush_notifications();
    }

    hub.store().close().await;
    tracing::info!("StudyHub shell closed");
    Ok(())
}

fn print_prompt() {
    use std::io::Write;
    print!("studyhub> ");
    let _ = std::io::stdout().flush();
}

fn parse_id(arg: &str) -> Result<i64, AppError> {
    arg.parse()
        .map_err(|_| AppError::validation(format!("'{arg}' is not a number")))
}

/// Run one shell command. Returns `Ok(false)` to leave the shell.
async fn execute(hub: &StudyHub, command: &str, arg: &str) -> Result<bool, AppError> {
    match command {
        "home" => {
            hub.navigate_dashboard();
        }
        "folder" => {
            hub.navigate_folder(FolderId::from_raw(parse_id(arg)?))?;
        }
        "topic" => {
            hub.navigate_topic(TopicId::from_raw(parse_id(arg)?))?;
        }
        "lesson" => {
            hub.navigate_lesson(LessonId::from_raw(parse_id(arg)?))?;
        }
        "search" => {
            hub.search(arg);
        }
        "preview" => {
            hub.preview_file(FileId::from_raw(parse_id(arg)?)).await?;
        }
        "close" => hub.close_preview(),
        "back" => {
            hub.navigate_up();
        }
        "upload" => {
            let lesson_id = hub
                .state()
                .current_lesson_id()
                .ok_or_else(|| AppError::validation("Open a lesson before uploading"))?;
            hub.upload_path(lesson_id, &PathBuf::from(arg)).await?;
        }
        "save" => {
            let (id, dir) = match arg.split_once(char::is_whitespace) {
                Some((id, dir)) => (id, PathBuf::from(dir.trim())),
                None => (arg, PathBuf::from(".")),
            };
            hub.download_file(FileId::from_raw(parse_id(id)?), &dir).await?;
        }
        "reload" => {
            hub.reload().await?;
        }
        "help" => println!("{HELP}"),
        "quit" | "exit" => return Ok(false),
        other => println!("Unknown command '{other}'. Type 'help' for commands."),
    }
    Ok(true)
}
