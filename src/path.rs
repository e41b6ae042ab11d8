//! # Transform Path Specs
//!
//! Path engine for JSON-to-JSON shift transforms:
//! - Parsing of dotted/bracketed path strings for either side of a rule
//! - Wildcard key matching with capture groups
//! - Back-references (`&`, `&1`, `&(1,2)`) into keys matched higher up the
//!   tree walk
//! - Evaluation of output paths into concrete segments
//!
//! Parsed paths are immutable and can be shared freely between walks. Each
//! walk owns its [`WalkedPath`].

pub mod element;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod reference;
pub mod walked;
pub mod writer;

// Re-exports
pub use element::*;
pub use error::*;
pub use matcher::*;
pub use parser::{PathParseError, Role, parse_path};
pub use reference::*;
pub use walked::*;
pub use writer::*;
