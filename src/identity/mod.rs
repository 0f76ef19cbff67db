//! Implementation identity inference from report paths.

pub mod resolver;

pub use resolver::{resolve_implementation_id, UNKNOWN_ID};
