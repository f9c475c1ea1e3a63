//! CLI command implementations.

pub mod adaa;
pub mod common;
pub mod spectrum;
pub mod train;
