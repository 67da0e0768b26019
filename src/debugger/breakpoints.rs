use std::collections::HashSet;

/// A set of 1-indexed line numbers. Lives independently of run state:
/// it survives restarts and program reloads.
#[derive(Debug, Clone, Default)]
pub struct Breakpoints {
    points: HashSet<usize>,
}

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add if absent, remove if present. Returns true when the line now
    /// carries a breakpoint.
    pub fn toggle(&mut self, line: usize) -> bool {
        if self.points.remove(&line) {
            false
        } else {
            self.points.insert(line);
            true
        }
    }

    pub fn add(&mut self, line: usize) {
        self.points.insert(line);
    }

    pub fn remove(&mut self, line: usize) {
        self.points.remove(&line);
    }

    pub fn has(&self, line: usize) -> bool {
        self.points.contains(&line)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Membership in ascending order, for gutters and protocol responses.
    pub fn sorted(&self) -> Vec<usize> {
        let mut lines: Vec<usize> = self.points.iter().copied().collect();
        lines.sort_unstable();
        lines
    }
}
