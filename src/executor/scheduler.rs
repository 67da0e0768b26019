use std::time::Duration;

/// One deferred continuation of a stepping chain. The generation token ties
/// it to the run that scheduled it; a stale token makes it a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    pub generation: u64,
    pub index: usize,
}

/// Cooperative single-slot scheduler for the stepping chain. Exactly one
/// continuation is pending at a time; starting a new run (or reloading the
/// program) bumps the generation and strands whatever was scheduled.
#[derive(Debug, Default)]
pub struct StepScheduler {
    pending: Option<ScheduledStep>,
    generation: u64,
    delay: Duration,
}

impl StepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `delay` is purely cosmetic: it makes stepping observable to an
    /// interactive renderer and carries no semantic meaning.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate every outstanding continuation and return the new run's
    /// generation token.
    pub fn invalidate(&mut self) -> u64 {
        self.generation += 1;
        self.pending = None;
        self.generation
    }

    pub fn schedule(&mut self, index: usize) {
        self.pending = Some(ScheduledStep {
            generation: self.generation,
            index,
        });
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Take the next live continuation, sleeping the cosmetic delay first.
    /// Steps from a superseded generation are dropped without running.
    pub fn take(&mut self) -> Option<ScheduledStep> {
        let step = self.pending.take()?;
        if step.generation != self.generation {
            return None;
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Some(step)
    }

    pub fn has_pending(&self) -> bool {
        matches!(self.pending, Some(step) if step.generation == self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_step_carries_current_generation() {
        let mut sched = StepScheduler::new();
        sched.schedule(4);
        assert!(sched.has_pending());
        let step = sched.take().expect("step should be live");
        assert_eq!(step.index, 4);
        assert_eq!(step.generation, sched.generation());
        assert!(!sched.has_pending(), "take consumes the slot");
    }

    #[test]
    fn invalidate_strands_pending_steps() {
        let mut sched = StepScheduler::new();
        sched.schedule(1);
        sched.invalidate();
        assert!(!sched.has_pending());
        assert_eq!(sched.take(), None, "stale step must be a no-op");
    }

    #[test]
    fn rescheduling_replaces_the_slot() {
        let mut sched = StepScheduler::new();
        sched.schedule(1);
        sched.schedule(2);
        assert_eq!(sched.take().map(|s| s.index), Some(2));
        assert_eq!(sched.take(), None);
    }
}
