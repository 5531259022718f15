//! Built-in IMCI catalogue
//!
//! A small set of assessment trees that ship with the engine. Most are built in
//! code; `general_danger_signs` is kept as a YAML document to double as a
//! reference for the tree file format.

pub mod birth_asphyxia;
pub mod cough;
pub mod jaundice;
pub mod malnutrition;

use crate::error::Result;
use triage_core::Tree;
use triage_parser::TreeParser;

/// Tree document for the general danger signs check
pub const GENERAL_DANGER_SIGNS_YAML: &str = include_str!("general_danger_signs.yaml");

pub const GENERAL_DANGER_SIGNS_TREE: &str = "general_danger_signs";

/// Default tree for subjects under 2 months
pub const DEFAULT_YOUNG_INFANT_TREE: &str = triage_runtime::classifier::imci::YOUNG_INFANT_JAUNDICE_TREE;

/// Default tree for subjects from 2 months
pub const DEFAULT_CHILD_TREE: &str = triage_runtime::classifier::imci::COUGH_TREE;

/// Every built-in tree
pub fn builtin_trees() -> Result<Vec<Tree>> {
    let mut trees = vec![
        birth_asphyxia::tree(),
        malnutrition::tree(),
        cough::tree(),
        jaundice::tree(),
    ];
    trees.extend(TreeParser::parse_multi(GENERAL_DANGER_SIGNS_YAML)?);
    Ok(trees)
}
