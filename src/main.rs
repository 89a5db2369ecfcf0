use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{backend::TermionBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use termion::raw::IntoRawMode;
use termion::screen::IntoAlternateScreen;

use markquill::app::state::AppState;
use markquill::config::Config;
use markquill::document::workspace::Workspace;
use markquill::input::InputHandler;
use markquill::session::RegistrySession;
use markquill::storage::FileStore;
use markquill::theme::get_builtin_theme;
use markquill::ui::UI;

/// Name of the document opened when no files are given.
const SCRATCH: &str = "[scratch]";

/// MarkQuill - labeled line bookmarks that follow your edits
#[derive(Parser)]
#[command(name = "markquill")]
#[command(version)]
#[command(about = "Labeled line bookmarks that follow your edits", long_about = None)]
struct Cli {
    /// Files to open (omit for an empty scratch document)
    files: Vec<PathBuf>,

    /// Theme name (overrides the config file)
    #[arg(short, long)]
    theme: Option<String>,

    /// Bookmark store file (overrides the config file)
    #[arg(short, long)]
    storage: Option<PathBuf>,
}

/// Set up a panic hook that restores the terminal before displaying panic information.
fn setup_panic_hook() {
    use std::panic;

    let default_panic = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = write!(io::stderr(), "{}", termion::screen::ToMainScreen);
        let _ = write!(io::stderr(), "{}", termion::cursor::Show);
        let _ = io::stderr().flush();

        default_panic(panic_info);
    }));
}

/// Sends tracing output to `<data dir>/markquill/markquill.log`.
///
/// The terminal belongs to the UI, so there is no stderr fallback: if the
/// file cannot be opened, logging stays off.
fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let Some(log_dir) = dirs::data_dir().map(|d| d.join("markquill")) else {
        return;
    };
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let log_path = log_dir.join("markquill.log");
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("MARKQUILL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("markquill=info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(path = ?log_path, "logging initialized");
}

fn main() -> Result<()> {
    setup_panic_hook();

    let cli = Cli::parse();
    setup_logging();

    let mut config = Config::load();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(storage) = cli.storage {
        config.storage_path = Some(storage);
    }

    // Load documents before taking over the terminal so errors print normally.
    let mut workspace = Workspace::new();
    for path in &cli.files {
        workspace.open_file(path)?;
    }
    if workspace.is_empty() {
        workspace.open_text(SCRATCH, SCRATCH, "");
    }

    let storage_path = config
        .resolved_storage_path()
        .context("Could not determine where to store bookmarks; pass --storage")?;
    let store = FileStore::open(&storage_path)
        .with_context(|| format!("Failed to open bookmark store {}", storage_path.display()))?;

    let theme = get_builtin_theme(&config.theme).unwrap_or_else(|| {
        eprintln!(
            "Warning: Theme '{}' not found, using default-dark",
            config.theme
        );
        markquill::theme::Theme {
            name: "default-dark".to_string(),
            colors: markquill::theme::colors::ThemeColors::default_dark(),
        }
    });
    let ui = UI::new(theme);

    let mut input_handler = if io::stdin().is_terminal() {
        InputHandler::new()
    } else {
        InputHandler::new_with_tty()?
    };

    let session = RegistrySession::new(workspace, store, config.session_options());
    let mut state = AppState::new(session, &config);

    let stdout = io::stdout()
        .into_raw_mode()
        .context("Failed to enable raw mode")?;
    let stdout = stdout
        .into_alternate_screen()
        .context("Failed to enter alternate screen")?;

    let backend = TermionBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_event_loop(&mut terminal, &ui, &mut input_handler, &mut state);

    write!(terminal.backend_mut(), "{}", termion::cursor::Show)?;
    terminal.backend_mut().flush()?;

    state.shutdown();

    result
}

fn run_event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    ui: &UI,
    input_handler: &mut InputHandler,
    state: &mut AppState<FileStore>,
) -> Result<()> {
    loop {
        let viewport_height = ui.render(terminal, state)?;
        input_handler.set_page_size(viewport_height);

        let Some(event) = input_handler.next_event()? else {
            break;
        };
        if input_handler.handle_event(event, state) {
            break;
        }
    }

    Ok(())
}
