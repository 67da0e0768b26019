mod controller;
mod scheduler;

pub use controller::{ExecutionController, NO_OUTPUT_PLACEHOLDER};
pub use scheduler::{ScheduledStep, StepScheduler};
