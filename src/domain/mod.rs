pub mod clock;
pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;
pub mod world;

pub use clock::Clock;
pub use errors::{ParseError, ParseResult};
pub use world::World;
