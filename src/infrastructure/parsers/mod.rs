pub mod family_parser;
pub mod toml_inner;

pub use family_parser::{parse_all, parse_family};
