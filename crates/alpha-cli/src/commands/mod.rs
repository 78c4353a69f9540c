//! CLI command implementations.

pub mod check;
pub mod config;
pub mod pnr;
pub mod roles;
pub mod version;
