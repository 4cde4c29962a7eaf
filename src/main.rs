//! lineterm - interactive command console demo
//!
//! Runs a [`Console`] full-screen in the current terminal with the
//! built-in commands registered.
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter | Submit line |
//! | ↑/↓ | Previous/next history entry |
//! | ←/→, Home/End | Move caret |
//! | Ctrl+V | Paste |
//! | Ctrl+L | Clear output |
//! | Ctrl+C, Ctrl+D | Quit |

use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use futures::executor::LocalPool;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lineterm::config::{data_dir, Config};
use lineterm::console::Console;
use lineterm::shell::CommandRegistry;
use lineterm::ui::keymapper::sanitize_paste;
use lineterm::ui::{Action, KeyMapper, Renderer};

/// Command line options
#[derive(Default)]
struct Args {
    /// Explicit config file
    config: Option<PathBuf>,
    /// Overrides `log_level` from the config file
    log_level: Option<String>,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("lineterm {}", VERSION);
}

fn print_help() {
    eprintln!("lineterm {} - An interactive command console", VERSION);
    eprintln!();
    eprintln!("Usage: lineterm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <PATH>       Use this config file");
    eprintln!("  --log-level <LEVEL>   trace, debug, info, warn, error");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Built-in commands (prefix is optional):");
    eprintln!("  /echo <words...>      Print the words");
    eprintln!("  /read                 Wait for one line");
    eprintln!("  /morning              Say good morning");
    eprintln!("  /exit                 Stop the current process");
    eprintln!();
    eprintln!("Configuration: ~/.lineterm/config.toml");
    eprintln!("Log file:      ~/.lineterm/lineterm.log");
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "--config" => {
                i += 1;
                let path = args.get(i).ok_or("Missing config path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--log-level" => {
                i += 1;
                let level = args.get(i).ok_or("Missing log level")?;
                parsed.log_level = Some(level.clone());
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(parsed)
}

/// Send tracing output to `~/.lineterm/lineterm.log`
fn init_logging(level: &str) {
    let log_path = data_dir()
        .map(|dir| dir.join("lineterm.log"))
        .unwrap_or_else(|| PathBuf::from("lineterm.log"));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let loaded = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let level = args.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_logging(&level);
    info!("lineterm {} starting...", VERSION);
    if let Some(e) = config_error {
        warn!("{}; using defaults", e);
    }
    info!("Color scheme: {}", config.color_scheme);

    let mut pool = LocalPool::new();
    let registry = Rc::new(CommandRegistry::with_builtins());
    info!("Registered commands: {}", registry.names().join(", "));
    let console = Console::new(registry, pool.spawner(), config);
    console.write(&format!("lineterm {} - type /echo hello, Ctrl+C to quit", VERSION), true);

    let mut renderer = Renderer::new();
    renderer.init()?;
    let result = run_main_loop(&console, &mut pool, &mut renderer);
    renderer.cleanup()?;

    if let Err(e) = &result {
        error!("Main loop failed: {:#}", e);
    }
    info!("lineterm exiting");
    result
}

fn run_main_loop(console: &Console, pool: &mut LocalPool, renderer: &mut Renderer) -> anyhow::Result<()> {
    let poll_timeout = Duration::from_millis(20);

    loop {
        // Let commands make progress before drawing
        pool.run_until_stalled();
        renderer.render(console)?;

        if !event::poll(poll_timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key_event) => {
                // Only process key press events
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                match KeyMapper::map(&key_event) {
                    Some(Action::Quit) => {
                        info!("Quit requested");
                        break;
                    }
                    Some(Action::Paste) => paste_from_clipboard(console),
                    Some(action) => KeyMapper::apply(action, console),
                    None => {}
                }
            }
            Event::Paste(text) => {
                KeyMapper::apply(Action::InsertText(sanitize_paste(&text)), console);
            }
            Event::Resize(cols, rows) => {
                info!("Resize: {}x{}", cols, rows);
                renderer.invalidate();
            }
            _ => {}
        }
    }

    Ok(())
}

fn paste_from_clipboard(console: &Console) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
        Ok(text) => KeyMapper::apply(Action::InsertText(sanitize_paste(&text)), console),
        Err(e) => warn!("Failed to paste: {}", e),
    }
}
