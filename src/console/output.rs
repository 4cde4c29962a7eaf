//! Scrollback model: lines made of colored spans.

use std::collections::VecDeque;

use crate::config::Color;

/// A run of text sharing one color
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    /// `None` means the renderer's default foreground
    pub color: Option<Color>,
}

/// One output line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputLine {
    spans: Vec<Span>,
}

impl OutputLine {
    /// Append text; merges into the last span when the color matches
    pub fn push(&mut self, text: &str, color: Option<Color>) {
        match self.spans.last_mut() {
            Some(last) if last.color == color => last.text.push_str(text),
            _ => self.spans.push(Span {
                text: text.to_string(),
                color,
            }),
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Plain text of the line without colors
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

/// Append-only output log
///
/// The last line is always open for writing. At most `capacity` finished
/// lines are kept besides it; the oldest are dropped first.
#[derive(Clone, Debug)]
pub struct OutputLog {
    lines: VecDeque<OutputLine>,
    capacity: usize,
}

impl OutputLog {
    pub fn new(capacity: usize) -> Self {
        let mut lines = VecDeque::new();
        lines.push_back(OutputLine::default());
        Self {
            lines,
            capacity: capacity.max(1),
        }
    }

    /// Append to the open line, optionally starting a new one afterwards
    pub fn write(&mut self, text: &str, color: Option<Color>, newline: bool) {
        if let Some(line) = self.lines.back_mut() {
            line.push(text, color);
        }
        if newline {
            self.lines.push_back(OutputLine::default());
            while self.lines.len() > self.capacity + 1 {
                self.lines.pop_front();
            }
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.lines.push_back(OutputLine::default());
    }

    /// All lines including the open (possibly empty) last one
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &OutputLine> + ExactSizeIterator {
        self.lines.iter()
    }

    /// Finished lines plus the open line if it has content, as plain text
    pub fn text_lines(&self) -> Vec<String> {
        let mut out: Vec<String> = self.lines.iter().map(OutputLine::text).collect();
        if out.last().map_or(false, |l| l.is_empty()) {
            out.pop();
        }
        out
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);

    #[test]
    fn test_write_without_newline_extends_line() {
        let mut log = OutputLog::new(100);
        log.write("Name: ", None, false);
        log.write("bob", None, true);
        assert_eq!(log.text_lines(), vec!["Name: bob"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_same_color_merges_spans() {
        let mut line = OutputLine::default();
        line.push("a", None);
        line.push("b", None);
        line.push("c", Some(RED));
        line.push("d", Some(RED));
        assert_eq!(line.spans().len(), 2);
        assert_eq!(line.spans()[1].text, "cd");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut log = OutputLog::new(3);
        for i in 0..5 {
            log.write(&i.to_string(), None, true);
        }
        assert_eq!(log.text_lines(), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_capacity_one_keeps_last_line() {
        let mut log = OutputLog::new(1);
        log.write("a", None, true);
        log.write("b", None, true);
        assert_eq!(log.text_lines(), vec!["b"]);
    }

    #[test]
    fn test_clear() {
        let mut log = OutputLog::new(10);
        log.write("x", None, true);
        log.clear();
        assert!(log.is_empty());
        assert!(log.text_lines().is_empty());
    }
}
