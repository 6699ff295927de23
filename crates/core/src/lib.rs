//! Core library: scanning, classification, naming, moves and the action log.

pub mod action_log;
pub mod categories;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fs_apply;
pub mod naming;
pub mod pipeline;
pub mod reanalyze;
pub mod scanner;
pub mod suggester;
