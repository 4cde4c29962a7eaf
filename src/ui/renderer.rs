//! Console renderer using crossterm
//!
//! Draws the newest output lines above a single input row. Only reads
//! console state; it never changes it.

use std::io::{self, Write};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::console::{Console, OutputLine, OutputLog};
use crate::editor::LineEditor;

/// What the input row shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    /// Visible part of the input text (after the prompt)
    pub text: String,
    /// Caret column, counting the prompt
    pub caret_col: u16,
}

/// Fit the input line into `width` columns, keeping the caret visible
pub fn layout_input(prompt: &str, editor: &LineEditor, width: u16) -> InputView {
    let prompt_width = prompt.width();
    let avail = (width as usize).saturating_sub(prompt_width + 1).max(1);
    let (before, after) = editor.split_at_cursor();

    // Drop chars from the front until the caret fits
    let mut shown_before: Vec<char> = before.chars().collect();
    let mut before_width = before.width();
    let mut skip = 0;
    while before_width > avail && skip < shown_before.len() {
        before_width -= shown_before[skip].width().unwrap_or(0);
        skip += 1;
    }
    shown_before.drain(..skip);

    let mut text: String = shown_before.into_iter().collect();
    let mut used = before_width;
    for ch in after.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > avail {
            break;
        }
        text.push(ch);
        used += w;
    }

    InputView {
        text,
        caret_col: (prompt_width + before_width).min(u16::MAX as usize) as u16,
    }
}

/// The newest `rows` output lines, oldest first
pub fn visible_lines(output: &OutputLog, rows: usize) -> Vec<&OutputLine> {
    let mut lines: Vec<&OutputLine> = output.lines().collect();
    // The open line is only shown once it has text
    if lines.last().map_or(false, |l| l.is_empty()) {
        lines.pop();
    }
    let start = lines.len().saturating_sub(rows);
    lines.split_off(start)
}

/// Terminal renderer
pub struct Renderer {
    /// Whether the terminal has been initialized
    initialized: bool,
    /// Console revision drawn last
    last_revision: Option<u64>,
    /// Size used for the last frame
    size: (u16, u16),
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            initialized: false,
            last_revision: None,
            size: (0, 0),
        }
    }

    /// Initialize the terminal for rendering
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            crossterm::event::EnableBracketedPaste,
            DisableLineWrap,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        stdout.flush()?;
        self.initialized = true;
        Ok(())
    }

    /// Cleanup the terminal
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();
        let _ = execute!(stdout, ResetColor, SetAttribute(Attribute::Reset));
        let _ = execute!(stdout, Show);
        let _ = execute!(stdout, EnableLineWrap);
        let _ = execute!(stdout, crossterm::event::DisableBracketedPaste);
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = stdout.flush();

        // Disable raw mode - this is the most important part
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force a redraw on the next `render`
    pub fn invalidate(&mut self) {
        self.last_revision = None;
    }

    /// Render the console if anything changed since the last frame
    pub fn render(&mut self, console: &Console) -> io::Result<()> {
        let size = terminal::size()?;
        if self.last_revision == Some(console.revision()) && self.size == size {
            return Ok(());
        }
        let (cols, rows) = size;
        if rows == 0 || cols == 0 {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut stdout = io::BufWriter::with_capacity(65536, stdout.lock());

        // Begin synchronized update (reduces flicker)
        write!(stdout, "\x1b[?2026h")?;
        queue!(stdout, Hide, Clear(ClearType::All))?;

        let output_rows = rows.saturating_sub(1) as usize;
        {
            let output = console.output();
            for (row, line) in visible_lines(&output, output_rows).into_iter().enumerate() {
                queue!(stdout, MoveTo(0, row as u16))?;
                self.render_line(&mut stdout, line, cols)?;
            }
        }

        let scheme = console.scheme();
        let prompt = console.config().prompt.as_str();
        let view = layout_input(prompt, &console.editor(), cols);
        let input_row = rows - 1;
        queue!(
            stdout,
            MoveTo(0, input_row),
            SetForegroundColor(scheme.prompt.to_crossterm()),
            Print(prompt),
            SetForegroundColor(scheme.foreground.to_crossterm()),
            Print(&view.text),
            ResetColor,
            MoveTo(view.caret_col.min(cols - 1), input_row),
            Show
        )?;

        // End synchronized update
        write!(stdout, "\x1b[?2026l")?;
        stdout.flush()?;

        self.last_revision = Some(console.revision());
        self.size = size;
        Ok(())
    }

    fn render_line<W: Write>(&self, out: &mut W, line: &OutputLine, cols: u16) -> io::Result<()> {
        let mut used = 0usize;
        for span in line.spans() {
            let mut text = String::new();
            for ch in span.text.chars() {
                let w = ch.width().unwrap_or(0);
                if used + w > cols as usize {
                    break;
                }
                text.push(ch);
                used += w;
            }
            match span.color {
                Some(color) => queue!(out, SetForegroundColor(color.to_crossterm()))?,
                None => queue!(out, ResetColor)?,
            }
            queue!(out, Print(text))?;
            if used >= cols as usize {
                break;
            }
        }
        queue!(out, ResetColor)
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str, back: isize) -> LineEditor {
        let mut editor = LineEditor::new();
        editor.insert(text);
        editor.move_cursor(-back);
        editor
    }

    #[test]
    fn test_layout_short_input() {
        let view = layout_input(">>> ", &editor("echo hi", 2), 80);
        assert_eq!(view.text, "echo hi");
        assert_eq!(view.caret_col, 9);
    }

    #[test]
    fn test_layout_scrolls_to_caret() {
        let view = layout_input("> ", &editor("abcdefghij", 0), 8);
        // 8 cols - 2 prompt - 1 spare = 5 visible
        assert_eq!(view.text, "fghij");
        assert_eq!(view.caret_col, 7);
    }

    #[test]
    fn test_layout_wide_chars() {
        let view = layout_input("", &editor("日本", 0), 80);
        assert_eq!(view.caret_col, 4);
    }

    #[test]
    fn test_visible_lines_newest() {
        let mut log = OutputLog::new(100);
        for i in 0..10 {
            log.write(&format!("line {}", i), None, true);
        }
        let lines: Vec<String> = visible_lines(&log, 3).iter().map(|l| l.text()).collect();
        assert_eq!(lines, vec!["line 7", "line 8", "line 9"]);
    }

    #[test]
    fn test_visible_lines_include_open_line_with_text() {
        let mut log = OutputLog::new(100);
        log.write("done", None, true);
        log.write("Name: ", None, false);
        let lines: Vec<String> = visible_lines(&log, 5).iter().map(|l| l.text()).collect();
        assert_eq!(lines, vec!["done", "Name: "]);
    }
}
