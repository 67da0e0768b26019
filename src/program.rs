/// The ordered, immutable-per-run view of source split into lines.
/// Indexed 0-based internally; breakpoints refer to lines 1-based.
#[derive(Debug, Clone, Default)]
pub struct Program {
    lines: Vec<String>,
}

impl Program {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The joined source, used by the non-stepped full run.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Empty and comment-only lines are skipped by the stepper: never
    /// evaluated, never produce output.
    pub fn is_skippable(line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with("//")
    }
}
