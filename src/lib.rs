//! lineterm - an embeddable line-oriented command console
//!
//! A single input line with history and caret editing, a scrollback of
//! colored output, and a registry of async commands. A command runs as a
//! [`Process`] that can write output, wait for further lines from the
//! same console, call other commands and exit with a code.
//!
//! # Architecture
//!
//! ```text
//! Console
//! ├── LineEditor (input text + caret)
//! │   └── HistoryBuffer (submitted lines + working slot)
//! ├── OutputLog (scrollback)
//! ├── pending reads (FIFO)
//! └── CommandRegistry ──dispatch──▶ Process ──▶ executor
//! ```
//!
//! Everything runs on one thread. Commands are spawned on a
//! `futures::executor::LocalPool` the host drives:
//!
//! ```
//! use std::rc::Rc;
//! use futures::executor::LocalPool;
//! use lineterm::{Config, Console, CommandRegistry};
//!
//! let mut pool = LocalPool::new();
//! let registry = Rc::new(CommandRegistry::with_builtins());
//! let console = Console::new(registry, pool.spawner(), Config::default());
//!
//! console.submit_line("/echo hello world");
//! pool.run_until_stalled();
//! assert_eq!(console.output_text(), vec!["/echo hello world", "hello world"]);
//! ```

pub mod config;
pub mod console;
pub mod editor;
pub mod error;
pub mod history;
pub mod process;
pub mod shell;
pub mod ui;

pub use config::{Color, ColorScheme, Config};
pub use console::Console;
pub use editor::{EditorMode, LineEditor};
pub use error::{ConfigError, ProcessError, TokenizeError};
pub use history::HistoryBuffer;
pub use process::Process;
pub use shell::{CommandDescriptor, CommandRegistry, OptionSpec, Options};
