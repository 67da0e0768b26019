use serde::Serialize;

/// Where the controller currently stands. `Finished` is transient and
/// collapses straight back to `Idle` after output is flushed, so it never
/// appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Running,
    PausedAtBreakpoint,
    PausedManually,
}

/// The observable execution record, serializable for UI adapters.
///
/// `current_line` is a 0-based index into the program (or the program
/// length as the end-of-run sentinel). `paused_at` is the 0-based index the
/// run resumes from; for a breakpoint pause that number equals the 1-indexed
/// line number of the just-evaluated breakpoint line.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionState {
    pub active: bool,
    pub current_line: Option<usize>,
    pub paused_at: Option<usize>,
    pub running: bool,
    pub evaluated_lines: Vec<usize>,
}

impl ExecutionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A line index is recorded at most once per run.
    pub fn mark_evaluated(&mut self, index: usize) {
        if !self.evaluated_lines.contains(&index) {
            self.evaluated_lines.push(index);
        }
    }
}
