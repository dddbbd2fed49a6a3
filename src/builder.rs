//! Append-only text buffer with an indent cursor.

const INDENT_WIDTH: usize = 4;

#[derive(Debug, Default)]
pub struct SourceBuilder {
    buf: String,
    level: usize,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn println(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    /// Writes the indent prefix for the current level, then `s`.
    pub fn iprint(&mut self, s: &str) {
        for _ in 0..self.level * INDENT_WIDTH {
            self.buf.push(' ');
        }
        self.buf.push_str(s);
    }

    pub fn iprintln(&mut self, s: &str) {
        self.iprint(s);
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}
