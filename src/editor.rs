//! Single-line editor with history recall
//!
//! Holds the live input text, a caret offset counted in chars, and the
//! [`HistoryBuffer`]. Knows nothing about commands; the input adapter
//! calls these operations and the console reads the result of `submit`.

use crate::history::HistoryBuffer;

/// Where the caret is expected to land on the next operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    /// Normal typing; the caret is where the last edit left it
    Editing,
    /// The text was just swapped from history; the caret jumps to the
    /// end on the next edit or move
    HistoryReview,
}

/// Editable input line
#[derive(Clone, Debug)]
pub struct LineEditor {
    text: String,
    /// Caret offset in chars, always within `0..=char_len`
    cursor: usize,
    history: HistoryBuffer,
    mode: EditorMode,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            history: HistoryBuffer::new(),
            mode: EditorMode::Editing,
        }
    }

    /// Current input text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret offset in chars
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Text before and after the caret, for rendering
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.text.split_at(self.byte_offset(self.cursor))
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Apply a pending history reset and return to editing
    fn settle(&mut self) {
        if self.mode == EditorMode::HistoryReview {
            self.cursor = self.char_len();
            self.mode = EditorMode::Editing;
        }
    }

    /// Insert text at the caret and advance past it
    pub fn insert(&mut self, text: &str) {
        self.settle();
        let at = self.byte_offset(self.cursor);
        self.text.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert(ch.encode_utf8(&mut buf));
    }

    /// Delete up to `count` chars before the caret (Backspace)
    pub fn delete_backward(&mut self, count: usize) {
        self.settle();
        let start = self.cursor.saturating_sub(count);
        let (from, to) = (self.byte_offset(start), self.byte_offset(self.cursor));
        self.text.replace_range(from..to, "");
        self.cursor = start;
    }

    /// Delete up to `count` chars after the caret (Delete)
    pub fn delete_forward(&mut self, count: usize) {
        self.settle();
        let end = (self.cursor + count).min(self.char_len());
        let (from, to) = (self.byte_offset(self.cursor), self.byte_offset(end));
        self.text.replace_range(from..to, "");
    }

    /// Move the caret by `delta` chars, clamped to the text
    pub fn move_cursor(&mut self, delta: isize) {
        self.settle();
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, self.char_len() as isize) as usize;
    }

    pub fn move_home(&mut self) {
        self.settle();
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.settle();
        self.cursor = self.char_len();
    }

    /// Recall the previous (older) history entry
    ///
    /// At the oldest entry the text is left alone and the caret goes to 0.
    pub fn history_prev(&mut self) {
        match self.history.prev().map(str::to_string) {
            Some(entry) => self.swap_text(entry),
            None => self.cursor = 0,
        }
    }

    /// Recall the next (newer) history entry
    ///
    /// At the working slot the text is left alone and the caret goes to the end.
    pub fn history_next(&mut self) {
        match self.history.next().map(str::to_string) {
            Some(entry) => self.swap_text(entry),
            None => self.cursor = self.char_len(),
        }
    }

    fn swap_text(&mut self, entry: String) {
        self.text = entry;
        self.cursor = self.cursor.min(self.char_len());
        self.mode = EditorMode::HistoryReview;
    }

    /// Finish the line: record it in history, clear the input, return it
    pub fn submit(&mut self) -> String {
        let line = std::mem::take(&mut self.text);
        self.history.record(&line);
        self.cursor = 0;
        self.mode = EditorMode::Editing;
        line
    }

    /// Drop the current input without touching history
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.mode = EditorMode::Editing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with(lines: &[&str]) -> LineEditor {
        let mut editor = LineEditor::new();
        for line in lines {
            editor.insert(line);
            editor.submit();
        }
        editor
    }

    #[test]
    fn test_insert_and_move() {
        let mut editor = LineEditor::new();
        editor.insert("helo");
        editor.move_cursor(-1);
        editor.insert_char('l');
        assert_eq!(editor.text(), "hello");
        assert_eq!(editor.cursor(), 4);

        editor.move_cursor(-100);
        assert_eq!(editor.cursor(), 0);
        editor.move_cursor(100);
        assert_eq!(editor.cursor(), 5);
    }

    #[test]
    fn test_delete_around_cursor() {
        let mut editor = LineEditor::new();
        editor.insert("abcdef");
        editor.move_cursor(-2);
        editor.delete_backward(2);
        assert_eq!(editor.text(), "abef");
        assert_eq!(editor.cursor(), 2);

        editor.delete_forward(10);
        assert_eq!(editor.text(), "ab");
        assert_eq!(editor.cursor(), 2);

        editor.delete_backward(10);
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_multibyte_text() {
        let mut editor = LineEditor::new();
        editor.insert("héllo");
        editor.move_cursor(-3);
        editor.delete_backward(1);
        assert_eq!(editor.text(), "hllo");
        assert_eq!(editor.split_at_cursor(), ("h", "llo"));
    }

    #[test]
    fn test_history_swap_defers_cursor_reset() {
        let mut editor = editor_with(&["echo hello"]);
        editor.insert("ab");
        editor.move_cursor(-1);

        editor.history_prev();
        assert_eq!(editor.text(), "echo hello");
        assert_eq!(editor.mode(), EditorMode::HistoryReview);
        // Caret lags until the next operation
        assert_eq!(editor.cursor(), 1);

        editor.insert("!");
        assert_eq!(editor.text(), "echo hello!");
        assert_eq!(editor.cursor(), 11);
        assert_eq!(editor.mode(), EditorMode::Editing);
    }

    #[test]
    fn test_history_swap_clamps_cursor() {
        let mut editor = editor_with(&["ab"]);
        editor.insert("a much longer draft");
        editor.history_prev();
        assert_eq!(editor.text(), "ab");
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn test_history_boundaries_move_caret_only() {
        let mut editor = editor_with(&["first"]);
        editor.history_prev();
        editor.move_end();
        editor.history_prev();
        assert_eq!(editor.text(), "first");
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.history().index(), 0);

        editor.history_next();
        assert_eq!(editor.text(), "");
        editor.history_next();
        assert_eq!(editor.text(), "");
        assert_eq!(editor.history().index(), 1);
    }

    #[test]
    fn test_submit_records_and_clears() {
        let mut editor = LineEditor::new();
        editor.insert("echo hi");
        assert_eq!(editor.submit(), "echo hi");
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.history().submitted(), &["echo hi"]);
    }

    #[test]
    fn test_consecutive_identical_submits_grow_history_once() {
        let mut editor = editor_with(&["same", "same"]);
        assert_eq!(editor.history().len(), 1);

        editor.history_prev();
        editor.submit();
        assert_eq!(editor.history().len(), 1);
        assert!(editor.history().at_newest());
    }

    #[test]
    fn test_clear_keeps_history() {
        let mut editor = editor_with(&["kept"]);
        editor.insert("draft");
        editor.clear();
        assert_eq!(editor.text(), "");
        assert_eq!(editor.history().len(), 1);
    }
}
