//! User interface rendering and input handling.
//!
//! - **keymapper**: keyboard input to line-editor actions
//! - **renderer**: crossterm drawing of the scrollback and input row

pub mod keymapper;
pub mod renderer;

pub use keymapper::{Action, KeyMapper, Modifiers};
pub use renderer::Renderer;
