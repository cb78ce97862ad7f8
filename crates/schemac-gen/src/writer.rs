//! Indented line writer for generated C text

const INDENT: usize = 4;

/// Accumulates lines of C at a tracked indentation column.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    column: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation. Empty text writes a bare newline.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.buf.extend(std::iter::repeat_n(' ', self.column));
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.buf.push('\n');
    }

    /// Write `text` and indent the following lines.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent();
    }

    /// Dedent, then write `text`.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.dedent();
        self.line(text);
    }

    pub fn indent(&mut self) {
        self.column += INDENT;
    }

    pub fn dedent(&mut self) {
        self.column = self.column.saturating_sub(INDENT);
    }

    /// Current indentation column.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Name of a JSON temporary declared at the current column.
    ///
    /// Every nested block sits at a deeper column, so names never clash
    /// with a temporary of an enclosing block.
    pub fn var(&self) -> String {
        format!("v{}", self.column)
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}
