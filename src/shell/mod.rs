//! Command registry and line dispatch.
//!
//! - **tokenizer**: splits a raw line into words (shell-like quoting)
//! - **options**: turns words into positional arguments and options
//! - **registry**: name → [`CommandDescriptor`] map and [`CommandRegistry::dispatch`]
//! - **builtins**: `read`, `echo`, `exit`, `morning`

pub mod builtins;
pub mod options;
pub mod registry;
pub mod tokenizer;

pub use options::{parse_options, OptionDef, OptionSpec, Options};
pub use registry::{Autocomplete, CommandDescriptor, CommandRegistry, Executor};
pub use tokenizer::tokenize;
