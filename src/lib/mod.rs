//! Shared library modules providing error types, path and file utilities, process helpers, and telemetry initialization.

pub mod browser;
pub mod errors;
pub mod fs;
pub mod menu;
pub mod paths;
pub mod telemetry;
