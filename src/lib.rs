//! Atmos configuration library
//!
//! Layered configuration resolution and stack config discovery for the atmos CLI.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod stacks;
