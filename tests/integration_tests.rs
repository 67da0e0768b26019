use script_debugger::debugger::Phase;
use script_debugger::executor::{ExecutionController, NO_OUTPUT_PLACEHOLDER};

// Helper to build a controller with a loaded program and breakpoints
fn controller_with(source: &str, breakpoints: &[usize]) -> ExecutionController {
    let mut ctl = ExecutionController::new();
    ctl.load_program(source);
    for &line in breakpoints {
        ctl.toggle_breakpoint(line);
    }
    ctl
}

#[cfg(test)]
mod full_run_tests {
    use super::*;

    #[test]
    fn printed_output_wins() {
        let mut ctl = controller_with("print(\"one\");", &[]);
        ctl.start();
        assert_eq!(ctl.output_text(), "one");
        assert_eq!(ctl.phase(), Phase::Idle);
        assert!(!ctl.state().active);
    }

    #[test]
    fn final_value_shown_when_nothing_printed() {
        let mut ctl = controller_with("let a = 6;\nlet b = 7;\na * b", &[]);
        ctl.start();
        assert_eq!(ctl.output_text(), "42");
    }

    #[test]
    fn placeholder_when_no_output_and_no_value() {
        let mut ctl = controller_with("// nothing", &[]);
        ctl.start();
        assert_eq!(ctl.output_text(), NO_OUTPUT_PLACEHOLDER);
    }

    #[test]
    fn assignment_only_program_yields_placeholder() {
        let mut ctl = controller_with("let x = 1;\nx = x + 1;", &[]);
        ctl.start();
        assert_eq!(ctl.output_text(), NO_OUTPUT_PLACEHOLDER);
    }

    #[test]
    fn failure_aborts_with_a_single_error_line() {
        let mut ctl = controller_with("print(\"a\");\nboom;\nprint(\"b\");", &[]);
        ctl.start();
        assert_eq!(ctl.output_text(), "Error: undefined variable `boom`");
        assert_eq!(ctl.phase(), Phase::Idle, "failed run returns to Idle");
    }

    #[test]
    fn each_start_gets_a_fresh_environment() {
        let mut ctl = controller_with("let x = 1;\nprint(x);", &[]);
        ctl.start();
        assert_eq!(ctl.output_text(), "1");
        // A second start must not see the old binding as already declared.
        ctl.start();
        assert_eq!(ctl.output_text(), "1");
    }
}

#[cfg(test)]
mod stepping_tests {
    use super::*;

    #[test]
    fn scenario_pause_then_resume() {
        let mut ctl = controller_with("let x = 1;\nx = x + 1;\nprint(x);", &[2]);

        ctl.start();
        ctl.run_until_settled();

        assert_eq!(ctl.phase(), Phase::PausedAtBreakpoint);
        assert_eq!(ctl.state().paused_at, Some(2));
        assert!(ctl.state().active);
        assert!(!ctl.state().running);
        assert_eq!(
            ctl.output().last_line(),
            Some("Paused at breakpoint (line 2)"),
            "pause notice should be the latest entry"
        );

        ctl.resume();
        ctl.run_until_settled();

        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.output_text(), "2", "notice stripped, print remains");
    }

    #[test]
    fn scenario_two_breakpoints_with_step() {
        let source = "let a = 1;\nlet b = 2;\nlet c = 3;\nlet d = 4;\nprint(a + b + c + d);";
        let mut ctl = controller_with(source, &[2, 4]);

        ctl.start();
        ctl.run_until_settled();
        assert_eq!(ctl.state().paused_at, Some(2), "first pause at line 2");

        ctl.step_to_next_breakpoint();
        ctl.run_until_settled();
        assert_eq!(ctl.state().paused_at, Some(4), "second pause at line 4");

        ctl.step_to_next_breakpoint();
        ctl.run_until_settled();
        assert_eq!(ctl.phase(), Phase::Idle, "third step reaches completion");
        assert_eq!(ctl.output_text(), "10");
    }

    #[test]
    fn breakpoints_pause_in_ascending_order_exactly_once() {
        let source = "print(1);\nprint(2);\nprint(3);\nprint(4);\nprint(5);";
        let mut ctl = controller_with(source, &[4, 1, 3]);

        let mut pauses = Vec::new();
        ctl.start();
        loop {
            ctl.run_until_settled();
            match ctl.phase() {
                Phase::PausedAtBreakpoint => {
                    pauses.push(ctl.state().paused_at.expect("paused_at set while paused"));
                    ctl.resume();
                }
                Phase::Idle => break,
                other => panic!("unexpected phase {:?}", other),
            }
        }

        assert_eq!(pauses, vec![1, 3, 4]);
        assert_eq!(ctl.output_text(), "1\n2\n3\n4\n5");
    }

    #[test]
    fn breakpointed_line_runs_before_the_pause_and_never_again() {
        let mut ctl = controller_with("print(\"hit\");\nprint(\"after\");", &[1]);

        ctl.start();
        ctl.run_until_settled();
        assert_eq!(
            ctl.output_text(),
            "hit\nPaused at breakpoint (line 1)",
            "breakpointed line is evaluated before pausing"
        );

        ctl.resume();
        ctl.run_until_settled();
        assert_eq!(ctl.output_text(), "hit\nafter", "line 1 not re-evaluated");
    }

    #[test]
    fn breakpoint_on_last_line_then_resume_finishes() {
        let mut ctl = controller_with("let x = 1;", &[1]);

        ctl.start();
        ctl.run_until_settled();
        assert_eq!(ctl.state().paused_at, Some(1));

        ctl.resume();
        ctl.run_until_settled();
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(
            ctl.output_text(),
            NO_OUTPUT_PLACEHOLDER,
            "silent stepped run ends with the placeholder"
        );
    }

    #[test]
    fn comment_and_empty_lines_are_skipped_but_marked_evaluated() {
        let source = "// comment\n\nlet x = 1;\nprint(x);";
        let mut ctl = controller_with(source, &[4]);

        ctl.start();
        ctl.run_until_settled();

        assert_eq!(ctl.state().paused_at, Some(4));
        assert_eq!(
            ctl.state().evaluated_lines,
            vec![0, 1, 2, 3],
            "skipped lines still count as evaluated"
        );
        assert_eq!(ctl.output_text(), "1\nPaused at breakpoint (line 4)");
    }

    #[test]
    fn breakpoint_on_a_comment_line_never_pauses() {
        let source = "// comment\nprint(\"x\");";
        let mut ctl = controller_with(source, &[1]);

        ctl.start();
        ctl.run_until_settled();

        assert_eq!(ctl.phase(), Phase::Idle, "comment lines skip the breakpoint check");
        assert_eq!(ctl.output_text(), "x");
    }

    #[test]
    fn line_error_is_reported_inline_and_the_run_continues() {
        let mut ctl = controller_with("print(1);\nboom;\nprint(2);", &[1]);

        ctl.start();
        ctl.run_until_settled();
        ctl.resume();
        ctl.run_until_settled();

        assert_eq!(
            ctl.output_text(),
            "1\nError at line 2: undefined variable `boom`\n2"
        );
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn bare_expression_value_is_appended_as_result_text() {
        let mut ctl = controller_with("let x = 20;\nx * 2 + 2\nprint(\"done\");", &[1]);

        ctl.start();
        ctl.run_until_settled();
        ctl.resume();
        ctl.run_until_settled();

        assert_eq!(ctl.output_text(), "42\ndone");
    }
}

#[cfg(test)]
mod control_tests {
    use super::*;

    #[test]
    fn manual_pause_stops_before_the_next_line() {
        let source = "print(\"a\");\nprint(\"b\");\nprint(\"c\");";
        let mut ctl = controller_with(source, &[3]);

        ctl.start();
        assert!(ctl.pump(), "first line should run");
        assert_eq!(ctl.output_text(), "a");

        ctl.pause();
        assert_eq!(ctl.phase(), Phase::PausedManually);
        assert_eq!(ctl.state().paused_at, Some(1), "line 2 was not yet evaluated");
        assert_eq!(
            ctl.output().last_line(),
            Some("Execution paused manually at line 2")
        );

        assert!(!ctl.pump(), "paused chain must not advance");
        assert_eq!(ctl.output().last_line(), Some("Execution paused manually at line 2"));

        ctl.resume();
        ctl.run_until_settled();
        assert_eq!(ctl.state().paused_at, Some(3), "resume re-runs from line 2");
        ctl.resume();
        ctl.run_until_settled();
        assert_eq!(ctl.output_text(), "a\nb\nc");
    }

    #[test]
    fn pause_is_a_no_op_unless_running() {
        let mut ctl = controller_with("print(1);", &[1]);
        ctl.pause();
        assert_eq!(ctl.phase(), Phase::Idle);

        ctl.start();
        ctl.run_until_settled();
        assert_eq!(ctl.phase(), Phase::PausedAtBreakpoint);
        ctl.pause();
        assert_eq!(ctl.phase(), Phase::PausedAtBreakpoint, "pause while paused is a no-op");
    }

    #[test]
    fn resume_and_step_are_no_ops_unless_paused() {
        let mut ctl = controller_with("print(1);\nprint(2);", &[]);
        ctl.resume();
        ctl.step_to_next_breakpoint();
        assert_eq!(ctl.phase(), Phase::Idle);
        assert!(ctl.output_text().is_empty(), "no run was started");
    }

    #[test]
    fn restart_matches_a_fresh_start() {
        let mut ctl = controller_with("let x = 1;\nx = x + 1;\nprint(x);", &[2]);

        // Fresh run, paused at line 2.
        ctl.start();
        ctl.run_until_settled();
        let fresh_output = ctl.output_text();
        let fresh_evaluated = ctl.state().evaluated_lines.clone();

        // Restart from the paused state reproduces it exactly.
        ctl.restart();
        ctl.run_until_settled();
        assert_eq!(ctl.output_text(), fresh_output);
        assert_eq!(ctl.state().evaluated_lines, fresh_evaluated);
        assert_eq!(ctl.state().paused_at, Some(2));
    }

    #[test]
    fn restart_after_completion_reruns_from_scratch() {
        let mut ctl = controller_with("print(\"once\");", &[]);
        ctl.start();
        assert_eq!(ctl.output_text(), "once");

        ctl.restart();
        assert_eq!(ctl.output_text(), "once", "not duplicated, not stale");
    }

    #[test]
    fn load_program_resets_the_run_but_keeps_breakpoints() {
        let mut ctl = controller_with("print(1);\nprint(2);", &[1]);

        ctl.start();
        ctl.run_until_settled();
        assert_eq!(ctl.phase(), Phase::PausedAtBreakpoint);

        ctl.load_program("print(9);\nprint(8);");
        assert_eq!(ctl.phase(), Phase::Idle, "edit force-resets the run");
        assert!(!ctl.state().active);
        assert!(ctl.output_text().is_empty(), "output cleared on load");
        assert!(ctl.breakpoints().has(1), "breakpoints survive the edit");

        ctl.start();
        ctl.run_until_settled();
        assert_eq!(ctl.output_text(), "9\nPaused at breakpoint (line 1)");
    }

    #[test]
    fn toggling_breakpoints_mid_run_affects_future_lines() {
        let source = "print(1);\nprint(2);\nprint(3);\nprint(4);";
        let mut ctl = controller_with(source, &[1, 3]);

        ctl.start();
        ctl.run_until_settled();
        assert_eq!(ctl.state().paused_at, Some(1));

        // Drop the pending breakpoint at 3, add one at 4.
        ctl.toggle_breakpoint(3);
        ctl.toggle_breakpoint(4);

        ctl.resume();
        ctl.run_until_settled();
        assert_eq!(ctl.state().paused_at, Some(4), "line 3 no longer pauses");
    }

    #[test]
    fn starting_again_invalidates_the_pending_chain() {
        let mut ctl = controller_with("print(\"x\");\nprint(\"y\");", &[2]);

        ctl.start();
        assert!(ctl.pump(), "line 1 runs in the first chain");

        // A second start while a continuation is pending must strand it.
        ctl.start();
        ctl.run_until_settled();

        assert_eq!(
            ctl.output_text(),
            "x\ny\nPaused at breakpoint (line 2)",
            "lines run exactly once in the second chain"
        );
    }

    #[test]
    fn load_program_invalidates_the_pending_chain() {
        let mut ctl = controller_with("print(\"x\");\nprint(\"y\");", &[2]);

        ctl.start();
        assert!(ctl.pump());

        ctl.load_program("print(\"z\");");
        assert!(!ctl.pump(), "stale continuation must be a no-op");
        assert!(ctl.output_text().is_empty());
    }

    #[test]
    fn empty_program_run_with_breakpoints_completes() {
        let mut ctl = controller_with("", &[1]);
        ctl.start();
        ctl.run_until_settled();
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.output_text(), NO_OUTPUT_PLACEHOLDER);
    }
}
