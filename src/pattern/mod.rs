//! Path pattern module.
//!
//! This module turns declared path templates into matchers and records where
//! each named parameter sits in the full path.

mod compile;
mod params;
mod template;

// Re-export public items
pub use compile::{compile, pattern_source, CompiledPattern, PathPattern};
pub use params::{extract_params, ParamMap};
pub use template::{parse_path, parse_prefix, Segment};
