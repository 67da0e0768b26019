use std::time::Duration;

use crate::debugger::{Breakpoints, ExecutionState, OutputLog, Phase};
use crate::interpreter::{eval_line, eval_program, CapturedPrints, Env, PrintSink};
use crate::program::Program;

use super::scheduler::StepScheduler;

/// Shown when a run completes without printing anything and without a
/// final value.
pub const NO_OUTPUT_PLACEHOLDER: &str = "Code executed successfully with no output.";

/// Sink that lands printed text in the output log the moment it is
/// produced, so observers polling between steps see partial progress.
struct LogSink<'a> {
    output: &'a mut OutputLog,
}

impl PrintSink for LogSink<'_> {
    fn print_line(&mut self, text: &str) {
        self.output.append_line(text);
    }
}

/// The state machine that drives stepping. The host (UI adapter, CLI, or
/// test) calls the public operations and drains the stepping chain with
/// `pump` / `run_until_settled`, which lets it repaint between lines.
pub struct ExecutionController {
    program: Program,
    breakpoints: Breakpoints,
    output: OutputLog,
    state: ExecutionState,
    phase: Phase,
    env: Env,
    scheduler: StepScheduler,
}

impl Default for ExecutionController {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionController {
    pub fn new() -> Self {
        Self {
            program: Program::default(),
            breakpoints: Breakpoints::new(),
            output: OutputLog::new(),
            state: ExecutionState::default(),
            phase: Phase::Idle,
            env: Env::new(),
            scheduler: StepScheduler::new(),
        }
    }

    /// A nonzero delay makes interactive stepping visible; it has no
    /// semantic effect.
    pub fn with_step_delay(delay: Duration) -> Self {
        Self {
            scheduler: StepScheduler::with_delay(delay),
            ..Self::new()
        }
    }

    // --- observable state -------------------------------------------------

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn output_text(&self) -> String {
        self.output.snapshot_text()
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    // --- public operations ------------------------------------------------

    /// Replace the program wholesale. Any active run is discarded, the
    /// output log is cleared, breakpoints are preserved.
    pub fn load_program(&mut self, text: &str) {
        self.program = Program::from_text(text);
        self.force_reset();
        self.output.clear();
    }

    /// Returns true when the line now carries a breakpoint. Toggling while
    /// a run is active affects only lines not yet dispatched.
    pub fn toggle_breakpoint(&mut self, line: usize) -> bool {
        self.breakpoints.toggle(line)
    }

    /// Replace breakpoint membership wholesale (adapter surface).
    pub fn set_breakpoints(&mut self, lines: &[usize]) {
        self.breakpoints.clear();
        for &line in lines {
            self.breakpoints.add(line);
        }
    }

    /// Begin a run: stepped when breakpoints exist, otherwise a single
    /// non-stepped full evaluation.
    pub fn start(&mut self) {
        self.force_reset();
        self.output.clear();

        if self.breakpoints.is_empty() {
            self.run_without_stepping();
            return;
        }

        self.phase = Phase::Running;
        self.state.active = true;
        self.state.running = true;
        self.state.current_line = Some(0);
        self.scheduler.schedule(0);
    }

    /// Valid only while `Running`; no-op otherwise. The pending line was
    /// scheduled but not evaluated, so resume re-runs it from the same spot.
    pub fn pause(&mut self) {
        if self.phase != Phase::Running || !self.state.running {
            return;
        }
        let at = self.state.current_line.unwrap_or(0);
        self.state.running = false;
        self.state.paused_at = Some(at);
        self.phase = Phase::PausedManually;
        self.output
            .append_transient(format!("Execution paused manually at line {}", at + 1));
        self.scheduler.cancel_pending();
    }

    /// Valid while paused; no-op otherwise. After a breakpoint pause this
    /// continues at the line after the pause point; after a manual pause it
    /// re-runs the line that was about to execute.
    pub fn resume(&mut self) {
        if !matches!(self.phase, Phase::PausedAtBreakpoint | Phase::PausedManually) {
            return;
        }
        let Some(resume_at) = self.state.paused_at else {
            return;
        };
        self.output.strip_transient();
        self.state.paused_at = None;
        self.state.running = true;
        self.phase = Phase::Running;
        self.state.current_line = Some(resume_at);
        self.scheduler.schedule(resume_at);
    }

    /// Continuous replay to the next breakpoint or completion. Functionally
    /// identical to `resume`, restricted to the paused phases.
    pub fn step_to_next_breakpoint(&mut self) {
        if matches!(self.phase, Phase::PausedAtBreakpoint | Phase::PausedManually) {
            self.resume();
        }
    }

    /// Clear output and execution state, then start over. Breakpoints are
    /// preserved.
    pub fn restart(&mut self) {
        self.output.clear();
        self.force_reset();
        self.start();
    }

    // --- stepping chain ---------------------------------------------------

    /// Run the next scheduled continuation, if any. Returns true when a
    /// line was dispatched; hosts poll this between repaints. A
    /// continuation from a superseded run, or one overtaken by a pause, is
    /// a silent no-op.
    pub fn pump(&mut self) -> bool {
        let Some(step) = self.scheduler.take() else {
            return false;
        };
        if !self.state.active || !self.state.running {
            return false;
        }
        self.execute_line(step.index);
        true
    }

    /// Drain the stepping chain until the run pauses or completes.
    pub fn run_until_settled(&mut self) -> Phase {
        while self.pump() {}
        self.phase
    }

    // --- internals --------------------------------------------------------

    fn force_reset(&mut self) {
        self.scheduler.invalidate();
        self.state.reset();
        self.phase = Phase::Idle;
        self.env = Env::new();
    }

    fn execute_line(&mut self, mut index: usize) {
        // Empty and comment lines are marked evaluated and skipped inline:
        // no evaluator call, no output, no scheduling delay.
        loop {
            if index >= self.program.len() {
                self.state.current_line = Some(index);
                self.finish();
                return;
            }
            self.state.current_line = Some(index);
            let skippable = self
                .program
                .line(index)
                .is_some_and(Program::is_skippable);
            if !skippable {
                break;
            }
            self.state.mark_evaluated(index);
            index += 1;
        }

        let line = self.program.line(index).unwrap_or_default().to_string();

        let Self { env, output, .. } = self;
        let mut sink = LogSink { output };
        match eval_line(&line, env, &mut sink) {
            Ok(Some(value)) => self.output.append_line(value.to_string()),
            Ok(None) => {}
            Err(err) => self
                .output
                .append_line(format!("Error at line {}: {}", index + 1, err)),
        }

        self.state.mark_evaluated(index);

        // The breakpointed line is evaluated first, then we pause, so its
        // effects are observable at the stop.
        if self.breakpoints.has(index + 1) {
            self.phase = Phase::PausedAtBreakpoint;
            self.state.running = false;
            self.state.paused_at = Some(index + 1);
            self.output
                .append_transient(format!("Paused at breakpoint (line {})", index + 1));
            return;
        }

        if index + 1 >= self.program.len() {
            self.state.current_line = Some(index + 1);
            self.finish();
            return;
        }

        self.state.current_line = Some(index + 1);
        self.scheduler.schedule(index + 1);
    }

    /// `Finished` is transient: flush output and collapse to `Idle`. The
    /// execution state and the environment die together here.
    fn finish(&mut self) {
        self.output.strip_transient();
        if self.output.is_empty() {
            self.output.append_line(NO_OUTPUT_PLACEHOLDER);
        }
        self.state.reset();
        self.phase = Phase::Idle;
        self.env = Env::new();
        self.scheduler.invalidate();
    }

    /// No breakpoints: evaluate the whole program as one unit in one
    /// environment. Printed output wins, then the final value's text, then
    /// the fixed placeholder. A single failure aborts the evaluation.
    fn run_without_stepping(&mut self) {
        let source = self.program.text();
        let mut sink = CapturedPrints::new();
        match eval_program(&source, &mut self.env, &mut sink) {
            Ok(final_value) => {
                if !sink.lines.is_empty() {
                    self.output.replace_all(sink.lines);
                } else if let Some(value) = final_value {
                    self.output.replace_all(vec![value.to_string()]);
                } else {
                    self.output
                        .replace_all(vec![NO_OUTPUT_PLACEHOLDER.to_string()]);
                }
            }
            Err(err) => self.output.replace_all(vec![format!("Error: {}", err)]),
        }
        self.env = Env::new();
    }
}
