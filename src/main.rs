use std::fs;
use std::io::{self, Write};
use std::time::Duration;

use script_debugger::adapter;
use script_debugger::debugger::Phase;
use script_debugger::executor::ExecutionController;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--adapter") {
        eprintln!("Starting in adapter mode...");
        return adapter::run_adapter_mode();
    }

    let Some(path) = args.get(1) else {
        eprintln!("Usage: script-debugger <script-file>");
        eprintln!("       script-debugger --adapter");
        std::process::exit(2);
    };

    eprintln!("Starting in interactive mode...");
    run_interactive_mode(path)
}

fn run_interactive_mode(path: &str) -> io::Result<()> {
    let source = fs::read_to_string(path)?;

    let mut ctl = ExecutionController::with_step_delay(Duration::from_millis(120));
    ctl.load_program(&source);

    eprintln!("Loaded {} ({} lines)", path, ctl.program().len());

    // Everything already echoed to stdout, so resumed runs only print the
    // delta.
    let mut shown = String::new();

    loop {
        eprintln!("\nCommands: (b)reakpoint <line>, (r)un, (c)ontinue, (s)tep to next breakpoint, restart, (l)ist, (o)utput, state, (q)uit");
        eprint!("> ");
        io::stderr().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words = shlex::split(input.trim()).unwrap_or_default();
        let cmd = words.first().map(String::as_str).unwrap_or("");

        match cmd {
            "b" | "breakpoint" => match words.get(1).and_then(|w| w.parse::<usize>().ok()) {
                Some(line) if line >= 1 && line <= ctl.program().len() => {
                    if ctl.toggle_breakpoint(line) {
                        eprintln!("🔴 Breakpoint set at line {}", line);
                    } else {
                        eprintln!("⚪ Breakpoint removed from line {}", line);
                    }
                }
                _ => eprintln!("❌ Invalid line number"),
            },

            "r" | "run" => {
                shown.clear();
                ctl.start();
                drain(&mut ctl, &mut shown);
            }

            "c" | "continue" | "resume" => {
                if paused(&ctl) {
                    ctl.resume();
                    drain(&mut ctl, &mut shown);
                } else {
                    eprintln!("❌ Nothing to resume");
                }
            }

            "s" | "step" => {
                if paused(&ctl) {
                    ctl.step_to_next_breakpoint();
                    drain(&mut ctl, &mut shown);
                } else {
                    eprintln!("❌ Not paused");
                }
            }

            "restart" => {
                shown.clear();
                ctl.restart();
                drain(&mut ctl, &mut shown);
            }

            "l" | "list" => list_program(&ctl),

            "o" | "output" => {
                eprintln!("--- output ---");
                println!("{}", ctl.output_text());
            }

            "state" => {
                eprintln!("phase: {:?}", ctl.phase());
                match serde_json::to_string_pretty(ctl.state()) {
                    Ok(json) => eprintln!("{}", json),
                    Err(err) => eprintln!("❌ {}", err),
                }
            }

            "q" | "quit" => break,
            "" => {}
            other => eprintln!("❓ Unknown command: {}", other),
        }
    }

    Ok(())
}

fn paused(ctl: &ExecutionController) -> bool {
    matches!(
        ctl.phase(),
        Phase::PausedAtBreakpoint | Phase::PausedManually
    )
}

/// Drain the stepping chain, echoing output to stdout as it grows.
fn drain(ctl: &mut ExecutionController, shown: &mut String) {
    loop {
        let stepped = ctl.pump();
        print_new_output(ctl, shown);
        if !stepped {
            break;
        }
    }

    match ctl.phase() {
        Phase::PausedAtBreakpoint => {
            if let Some(at) = ctl.state().paused_at {
                eprintln!("🔍 Paused at breakpoint (line {})", at);
            }
        }
        Phase::PausedManually => eprintln!("⏸  Paused"),
        Phase::Idle => eprintln!("✅ Run finished"),
        Phase::Running => {}
    }
}

fn print_new_output(ctl: &ExecutionController, shown: &mut String) {
    // Pause notices live in the log as transient entries and are announced
    // on stderr by `drain`; stdout carries program output only. Diffing the
    // permanent view keeps `shown` a prefix even after a resume strips a
    // notice out of the log.
    let snapshot = ctl.output().permanent_text();
    if snapshot == *shown {
        return;
    }
    if let Some(delta) = snapshot.strip_prefix(shown.as_str()) {
        let delta = delta.strip_prefix('\n').unwrap_or(delta);
        if !delta.is_empty() {
            println!("{}", delta);
        }
    }
    *shown = snapshot;
}

fn list_program(ctl: &ExecutionController) {
    let current = ctl.state().current_line;
    for (i, line) in ctl.program().lines().iter().enumerate() {
        let gutter = if ctl.breakpoints().has(i + 1) { '●' } else { ' ' };
        let arrow = if current == Some(i) { '>' } else { ' ' };
        eprintln!("{}{} {:>3} | {}", gutter, arrow, i + 1, line);
    }
}
