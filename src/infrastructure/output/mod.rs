pub mod job_log_sink;
pub mod status_json;

pub use job_log_sink::JobLogSink;
pub use status_json::{write_status_json, StatusBody, StatusReport};
