//! Shared infrastructure utilities.

pub mod logging;
