use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::debugger::Phase;
use crate::executor::ExecutionController;

use super::protocol::{AdapterMessage, AdapterMessageContent};

/// Drives an `ExecutionController` on behalf of an out-of-process UI:
/// requests come in as JSON lines on stdin, responses and events go out on
/// stdout. Status chatter stays on stderr.
pub struct AdapterServer {
    controller: ExecutionController,
    seq: u64,
    run_in_flight: bool,
    last_output: String,
}

impl Default for AdapterServer {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterServer {
    pub fn new() -> Self {
        Self {
            controller: ExecutionController::new(),
            seq: 0,
            run_in_flight: false,
            last_output: String::new(),
        }
    }

    pub fn read_message(&mut self) -> Option<AdapterMessage> {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match serde_json::from_str(trimmed) {
                        Ok(msg) => return Some(msg),
                        Err(err) => {
                            eprintln!("malformed adapter message: {}", err);
                        }
                    }
                }
                Err(_) => return None,
            }
        }
    }

    pub fn send_response(
        &mut self,
        request_seq: u64,
        command: &str,
        success: bool,
        message: Option<String>,
        body: Option<Value>,
    ) {
        self.seq += 1;
        let msg = AdapterMessage {
            seq: self.seq,
            msg_type: "response".to_string(),
            content: AdapterMessageContent::Response {
                request_seq,
                success,
                command: command.to_string(),
                message,
                body,
            },
        };
        self.write_message(&msg);
    }

    pub fn send_event(&mut self, event: &str, body: Option<Value>) {
        self.seq += 1;
        let msg = AdapterMessage {
            seq: self.seq,
            msg_type: "event".to_string(),
            content: AdapterMessageContent::Event {
                event: event.to_string(),
                body,
            },
        };
        self.write_message(&msg);
    }

    fn write_message(&mut self, msg: &AdapterMessage) {
        match serde_json::to_string(msg) {
            Ok(text) => {
                let mut stdout = io::stdout().lock();
                let _ = writeln!(stdout, "{}", text);
                let _ = stdout.flush();
            }
            Err(err) => eprintln!("failed to serialize adapter message: {}", err),
        }
    }

    // --- request handlers -------------------------------------------------

    pub fn handle_load_program(&mut self, seq: u64, arguments: Option<Value>) {
        let text = arguments.and_then(|a| {
            a.get("text")
                .and_then(Value::as_str)
                .map(str::to_string)
        });
        match text {
            Some(text) => {
                self.controller.load_program(&text);
                self.run_in_flight = false;
                self.last_output.clear();
                let lines = self.controller.program().len();
                self.send_response(
                    seq,
                    "loadProgram",
                    true,
                    None,
                    Some(json!({ "lines": lines })),
                );
            }
            None => self.send_response(
                seq,
                "loadProgram",
                false,
                Some("missing `text` argument".to_string()),
                None,
            ),
        }
    }

    pub fn handle_set_breakpoints(&mut self, seq: u64, arguments: Option<Value>) {
        let lines: Vec<usize> = arguments
            .and_then(|a| a.get("lines").and_then(Value::as_array).cloned())
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_u64)
            .map(|n| n as usize)
            .collect();
        self.controller.set_breakpoints(&lines);
        let body = json!({ "breakpoints": self.controller.breakpoints().sorted() });
        self.send_response(seq, "setBreakpoints", true, None, Some(body));
    }

    pub fn handle_toggle_breakpoint(&mut self, seq: u64, arguments: Option<Value>) {
        let line = arguments.and_then(|a| a.get("line").and_then(Value::as_u64));
        match line {
            Some(line) => {
                let active = self.controller.toggle_breakpoint(line as usize);
                let body = json!({ "line": line, "active": active });
                self.send_response(seq, "toggleBreakpoint", true, None, Some(body));
            }
            None => self.send_response(
                seq,
                "toggleBreakpoint",
                false,
                Some("missing `line` argument".to_string()),
                None,
            ),
        }
    }

    pub fn handle_start(&mut self, seq: u64) {
        self.controller.start();
        self.run_in_flight = true;
        self.send_response(seq, "start", true, None, None);
        self.drive();
    }

    pub fn handle_resume(&mut self, seq: u64) {
        if !self.paused() {
            self.send_response(
                seq,
                "resume",
                false,
                Some("not paused".to_string()),
                None,
            );
            return;
        }
        self.controller.resume();
        self.send_response(seq, "resume", true, None, None);
        self.drive();
    }

    pub fn handle_step(&mut self, seq: u64) {
        if !self.paused() {
            self.send_response(
                seq,
                "stepToNextBreakpoint",
                false,
                Some("not paused".to_string()),
                None,
            );
            return;
        }
        self.controller.step_to_next_breakpoint();
        self.send_response(seq, "stepToNextBreakpoint", true, None, None);
        self.drive();
    }

    pub fn handle_pause(&mut self, seq: u64) {
        // The stepping chain is drained before we read the next request, so
        // by the time a pause arrives the run is already paused or done.
        // Honored anyway for hosts that pump the controller themselves.
        self.controller.pause();
        self.send_response(seq, "pause", true, None, None);
        self.emit_progress();
    }

    pub fn handle_restart(&mut self, seq: u64) {
        self.controller.restart();
        self.run_in_flight = true;
        self.send_response(seq, "restart", true, None, None);
        self.drive();
    }

    pub fn handle_state(&mut self, seq: u64) {
        let state = match serde_json::to_value(self.controller.state()) {
            Ok(v) => v,
            Err(_) => Value::Null,
        };
        let phase = match serde_json::to_value(self.controller.phase()) {
            Ok(v) => v,
            Err(_) => Value::Null,
        };
        let body = json!({
            "phase": phase,
            "state": state,
            "output": self.controller.output_text(),
            "breakpoints": self.controller.breakpoints().sorted(),
        });
        self.send_response(seq, "state", true, None, Some(body));
    }

    // --- internals --------------------------------------------------------

    fn paused(&self) -> bool {
        matches!(
            self.controller.phase(),
            Phase::PausedAtBreakpoint | Phase::PausedManually
        )
    }

    /// Drain the stepping chain, then report what changed.
    fn drive(&mut self) {
        self.controller.run_until_settled();
        self.emit_progress();
    }

    fn emit_progress(&mut self) {
        let output = self.controller.output_text();
        if output != self.last_output {
            self.last_output = output.clone();
            self.send_event("output", Some(json!({ "text": output })));
        }

        match self.controller.phase() {
            Phase::PausedAtBreakpoint => {
                let paused_at = self.controller.state().paused_at;
                self.send_event(
                    "stopped",
                    Some(json!({ "reason": "breakpoint", "pausedAt": paused_at })),
                );
            }
            Phase::PausedManually => {
                let paused_at = self.controller.state().paused_at;
                self.send_event(
                    "stopped",
                    Some(json!({ "reason": "pause", "pausedAt": paused_at })),
                );
            }
            Phase::Idle => {
                if self.run_in_flight {
                    self.run_in_flight = false;
                    self.send_event("terminated", None);
                }
            }
            Phase::Running => {}
        }
    }
}
