//! World repository trait
//!
//! Abstracts scanning today's log directory into the `family -> job ->
//! JobResult` projection the scheduling engine joins against (spec §4.3).
//! The filesystem-backed implementation lives in
//! `infrastructure::repositories::filesystem_world_repository`.

use anyhow::Result;

use crate::domain::world::World;

pub trait WorldRepository: Send + Sync {
    /// Scans today's log directory and builds the world projection. A
    /// missing directory is not an error: callers get an empty `World`.
    fn load_today(&self) -> Result<World>;
}
