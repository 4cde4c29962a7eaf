//! Key mapping for the input line
//!
//! Converts crossterm key events into line-editor actions. This is the
//! only place that looks at raw key events.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::console::Console;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// What a key press asks the console to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    /// Text from a bracketed paste event
    InsertText(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    HistoryPrev,
    HistoryNext,
    Submit,
    /// Paste from the system clipboard
    Paste,
    ClearOutput,
    Quit,
}

/// Key mapper for converting key events to actions
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent to an action
    pub fn map(event: &KeyEvent) -> Option<Action> {
        let mods = Modifiers::from(event.modifiers);

        if mods.contains(Modifiers::CTRL) {
            return match event.code {
                KeyCode::Char('c') | KeyCode::Char('d') => Some(Action::Quit),
                KeyCode::Char('v') => Some(Action::Paste),
                KeyCode::Char('l') => Some(Action::ClearOutput),
                KeyCode::Char('a') => Some(Action::Home),
                KeyCode::Char('e') => Some(Action::End),
                _ => None,
            };
        }

        match event.code {
            KeyCode::Char(ch) if !mods.contains(Modifiers::ALT) => Some(Action::Insert(ch)),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Delete => Some(Action::Delete),
            KeyCode::Left => Some(Action::Left),
            KeyCode::Right => Some(Action::Right),
            KeyCode::Home => Some(Action::Home),
            KeyCode::End => Some(Action::End),
            KeyCode::Up => Some(Action::HistoryPrev),
            KeyCode::Down => Some(Action::HistoryNext),
            _ => None,
        }
    }

    /// Apply an editing action to the console
    ///
    /// `Paste` and `Quit` need the host and are ignored here.
    pub fn apply(action: Action, console: &Console) {
        match action {
            Action::Insert(ch) => console.edit(|e| e.insert_char(ch)),
            Action::InsertText(text) => console.edit(|e| e.insert(&text)),
            Action::Backspace => console.edit(|e| e.delete_backward(1)),
            Action::Delete => console.edit(|e| e.delete_forward(1)),
            Action::Left => console.edit(|e| e.move_cursor(-1)),
            Action::Right => console.edit(|e| e.move_cursor(1)),
            Action::Home => console.edit(|e| e.move_home()),
            Action::End => console.edit(|e| e.move_end()),
            Action::HistoryPrev => console.edit(|e| e.history_prev()),
            Action::HistoryNext => console.edit(|e| e.history_next()),
            Action::Submit => {
                console.submit();
            }
            Action::ClearOutput => console.clear_output(),
            Action::Paste | Action::Quit => {}
        }
    }
}

/// Strip line breaks from pasted text; the input is a single line
pub fn sanitize_paste(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::executor::LocalPool;

    use super::*;
    use crate::config::Config;
    use crate::shell::CommandRegistry;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_char_keys() {
        let event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(Action::Insert('a')));

        let event = key_event(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(KeyMapper::map(&event), Some(Action::Insert('A')));

        let event = key_event(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_control_keys() {
        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(Action::Quit));

        let event = key_event(KeyCode::Char('v'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(Action::Paste));

        let event = key_event(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_navigation_keys() {
        let event = key_event(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(Action::HistoryPrev));

        let event = key_event(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(Action::HistoryNext));

        let event = key_event(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(Action::Submit));
    }

    #[test]
    fn test_typing_session() {
        let mut pool = LocalPool::new();
        let registry = Rc::new(CommandRegistry::with_builtins());
        let console = Console::new(registry, pool.spawner(), Config::default());

        for ch in "echo hi".chars() {
            KeyMapper::apply(Action::Insert(ch), &console);
        }
        KeyMapper::apply(Action::Submit, &console);
        pool.run_until_stalled();
        assert_eq!(console.output_text(), vec!["echo hi", "hi"]);

        KeyMapper::apply(Action::HistoryPrev, &console);
        assert_eq!(console.editor().text(), "echo hi");
        KeyMapper::apply(Action::Backspace, &console);
        assert_eq!(console.editor().text(), "echo h");
    }

    #[test]
    fn test_sanitize_paste() {
        assert_eq!(sanitize_paste("echo a\nb\r\n"), "echo a b");
    }
}
