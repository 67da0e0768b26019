mod protocol;
mod server;

use std::io;

pub use protocol::{AdapterMessage, AdapterMessageContent};
pub use server::AdapterServer;

/// Request loop for `--adapter` mode: one JSON request per stdin line,
/// responses and events as JSON lines on stdout.
pub fn run_adapter_mode() -> io::Result<()> {
    eprintln!("Adapter mode: reading JSON requests from stdin...");

    let mut server = AdapterServer::new();

    while let Some(msg) = server.read_message() {
        match msg.content {
            AdapterMessageContent::Request { command, arguments } => match command.as_str() {
                "loadProgram" => server.handle_load_program(msg.seq, arguments),
                "setBreakpoints" => server.handle_set_breakpoints(msg.seq, arguments),
                "toggleBreakpoint" => server.handle_toggle_breakpoint(msg.seq, arguments),
                "start" => server.handle_start(msg.seq),
                "resume" => server.handle_resume(msg.seq),
                "stepToNextBreakpoint" => server.handle_step(msg.seq),
                "pause" => server.handle_pause(msg.seq),
                "restart" => server.handle_restart(msg.seq),
                "state" => server.handle_state(msg.seq),
                "disconnect" => {
                    server.send_response(msg.seq, "disconnect", true, None, None);
                    break;
                }
                other => {
                    eprintln!("unhandled adapter command: {}", other);
                    server.send_response(msg.seq, other, false, None, None);
                }
            },
            _ => {
                eprintln!("ignoring non-request message");
            }
        }
    }

    Ok(())
}
