//! Library crate root re-exporting profile, CLI, and helper modules.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod cli;
pub mod profiles;
