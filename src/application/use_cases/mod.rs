pub mod hold_job;
pub mod main_loop;
pub mod mark_job;
pub mod rerun_job;
pub mod run_tick;

pub use hold_job::{hold_job, release_dependencies, remove_hold};
pub use main_loop::{reconcile_token_usage, run_loop};
pub use mark_job::mark_job;
pub use rerun_job::rerun_job;
pub use run_tick::{run_tick, TickOutcome};
