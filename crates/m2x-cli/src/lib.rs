//! Event-file plumbing shared by the `m2x` subcommands.

pub mod lhe;

pub use lhe::{open, write_event, LheReader};
