pub mod scheduling_engine;
pub mod token_store;

pub use scheduling_engine::{run_scheduling_pass, SchedulingResult};
