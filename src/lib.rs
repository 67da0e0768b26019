pub mod adapter;
pub mod debugger;
pub mod executor;
pub mod interpreter;
pub mod program;
