/// Ordered, append-only log of run output. Entries are either permanent
/// (printed text, result text, error lines) or transient status notices
/// that get stripped when the run resumes.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Permanent(String),
    Transient(String),
}

impl Entry {
    fn text(&self) -> &str {
        match self {
            Entry::Permanent(t) | Entry::Transient(t) => t,
        }
    }
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_line(&mut self, text: impl Into<String>) {
        self.entries.push(Entry::Permanent(text.into()));
    }

    /// Pause notices. Removed by `strip_transient` before a resumed run
    /// appends new output.
    pub fn append_transient(&mut self, text: impl Into<String>) {
        self.entries.push(Entry::Transient(text.into()));
    }

    pub fn strip_transient(&mut self) {
        self.entries.retain(|e| matches!(e, Entry::Permanent(_)));
    }

    pub fn replace_all(&mut self, lines: Vec<String>) {
        self.entries = lines.into_iter().map(Entry::Permanent).collect();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Newline-joined view for display. Grows monotonically between pauses,
    /// so an observer polling between steps sees partial progress.
    pub fn snapshot_text(&self) -> String {
        self.entries
            .iter()
            .map(Entry::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Newline-joined view of permanent entries only. Unlike
    /// `snapshot_text`, this never shrinks within a run, so hosts echoing
    /// program output incrementally can diff against it.
    pub fn permanent_text(&self) -> String {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Permanent(t) => Some(t.as_str()),
                Entry::Transient(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn last_line(&self) -> Option<&str> {
        self.entries.last().map(Entry::text)
    }
}
