use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use ratatui::{backend::TermionBackend, Terminal};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use termion::input::MouseTerminal;
use termion::raw::IntoRawMode;
use termion::screen::IntoAlternateScreen;

use treequill::config::Config;
use treequill::document::node::NodeId;
use treequill::document::sample::{sample_tree, SAMPLE_ROOT_ID};
use treequill::document::tree::NodeTree;
use treequill::editor::state::EditorState;
use treequill::input::InputHandler;
use treequill::logging;
use treequill::service::http::HttpTreeService;
use treequill::service::memory::InMemoryTreeService;
use treequill::service::TreeService;
use treequill::theme::get_builtin_theme;
use treequill::ui::UI;
use treequill::worker::Worker;

/// TreeQuill - A terminal editor for a remote tree of nodes
#[derive(Parser)]
#[command(name = "treequill")]
#[command(version)]
#[command(about = "A terminal editor for a remote tree of nodes", long_about = None)]
struct Cli {
    /// Base URL of the tree service (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,

    /// Edit the bundled sample tree in memory instead of talking to a service
    #[arg(long)]
    offline: bool,

    /// Theme name (overrides the config file)
    #[arg(short, long)]
    theme: Option<String>,

    /// Log file (default: under the cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Config file (default: ~/.config/treequill/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Set up a panic hook that restores the terminal before displaying panic information.
///
/// This ensures that panics are visible even when the terminal is in raw mode with alternate screen.
fn setup_panic_hook() {
    use std::panic;

    // Take the default panic hook so we can call it after restoration
    let default_panic = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        // Exit alternate screen and show cursor on stderr
        let _ = write!(io::stderr(), "{}", termion::screen::ToMainScreen);
        let _ = write!(io::stderr(), "{}", termion::cursor::Show);
        let _ = io::stderr().flush();

        default_panic(panic_info);
    }));
}

fn main() -> Result<()> {
    setup_panic_hook();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    // Log before taking over the terminal so setup problems are visible
    let log_path = cli
        .log_file
        .or_else(|| config.log_file.clone())
        .or_else(logging::default_log_path);
    if let Some(path) = &log_path {
        if let Err(err) = logging::init(path, &config.log_level) {
            eprintln!("Warning: logging disabled: {:#}", err);
        }
    }
    info!("Starting treequill {}", env!("CARGO_PKG_VERSION"));

    let (service, root_id, source_label): (Box<dyn TreeService>, NodeId, String) = if cli.offline
    {
        let tree = sample_tree();
        (
            Box::new(InMemoryTreeService::new(&tree)),
            NodeId::from(SAMPLE_ROOT_ID),
            "offline".to_string(),
        )
    } else {
        let mut service =
            HttpTreeService::new(&config.server_url, config.api, config.request_timeout())?;
        if let Some(path) = &config.avatar_file {
            service = service.with_static_avatar(path.clone());
        }
        let label = service.base_url().to_string();
        (Box::new(service), config.root_id.clone(), label)
    };
    info!("Using {} with root id {}", source_label, root_id);

    let worker = Worker::spawn(service)?;

    let theme = get_builtin_theme(&config.theme).unwrap_or_else(|| {
        warn!("Theme '{}' not found, using default-dark", config.theme);
        eprintln!(
            "Warning: Theme '{}' not found, using default-dark",
            config.theme
        );
        treequill::theme::Theme {
            name: "default-dark".to_string(),
            colors: treequill::theme::colors::ThemeColors::default_dark(),
        }
    });
    let ui = UI::new(theme);
    info!("Theme: {}", ui.theme_name());

    let mut state = EditorState::new(NodeTree::empty(root_id));
    state.set_source_label(source_label);
    state.set_max_depth(config.max_depth);
    state.set_enable_mouse(config.enable_mouse);
    state.set_load_avatars(config.avatars);
    state.load_tree();

    let mut input_handler = InputHandler::spawn()?;

    // Setup terminal
    let stdout = io::stdout()
        .into_raw_mode()
        .context("Failed to enable raw mode")?;
    let stdout = MouseTerminal::from(stdout);
    let stdout = stdout
        .into_alternate_screen()
        .context("Failed to enter alternate screen")?;

    let backend = TermionBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_event_loop(&mut terminal, &ui, &mut input_handler, &worker, &mut state);

    // Termion restores the terminal through Drop guards, but the cursor must be shown again
    write!(terminal.backend_mut(), "{}", termion::cursor::Show)?;
    terminal.backend_mut().flush()?;

    info!("Exiting");
    result
}

fn run_event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    ui: &UI,
    input_handler: &mut InputHandler,
    worker: &Worker,
    state: &mut EditorState,
) -> Result<()> {
    loop {
        while let Some(response) = worker.try_recv() {
            state.complete(response);
        }
        for request in state.drain_requests() {
            worker.submit(request);
        }

        ui.render(terminal, state)?;

        if let Some(event) = input_handler.poll_event(Duration::from_millis(100))? {
            if input_handler.handle_event(event, state)? {
                break;
            }
        }
    }

    Ok(())
}
