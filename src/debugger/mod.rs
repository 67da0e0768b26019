mod breakpoints;
mod output;
mod state;

pub use breakpoints::Breakpoints;
pub use output::OutputLog;
pub use state::{ExecutionState, Phase};
