pub mod calendar;
pub mod days;
pub mod dependency;
pub mod family;
pub mod forest;
pub mod info_file;
pub mod job;
pub mod job_result;
pub mod job_status;
pub mod marker;
pub mod token;

pub use calendar::Calendar;
pub use days::Days;
pub use dependency::{Dependency, ExternalDependency, JobDependency, TimeDependency};
pub use family::{CalendarOrDays, Family};
pub use forest::{Forest, ForestItem};
pub use info_file::InfoFile;
pub use job::Job;
pub use job_result::JobResult;
pub use job_status::JobStatus;
pub use marker::{MarkerKind, MarkerState};
pub use token::TokenHolder;
