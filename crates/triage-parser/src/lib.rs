//! Triage Parser - YAML / JSON to tree model parser
//!
//! This crate converts tree documents into `triage_core::Tree` values.
//!
//! A document holds one tree under a top-level `tree:` key. YAML files may
//! carry several trees separated by `---` (or simply by repeating `tree:` at
//! column 0). JSON documents use the same shape.

pub mod error;
pub mod tree_parser;
pub mod yaml_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use tree_parser::TreeParser;
pub use yaml_parser::YamlParser;
