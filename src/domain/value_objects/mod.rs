pub mod info_file_name;
pub mod job_key;
pub mod time_of_day;

pub use info_file_name::{FileKind, InfoFileName};
pub use job_key::JobKey;
pub use time_of_day::TimeOfDay;
