//! CLI command implementations.

pub mod common;
pub mod config;
pub mod convert;
pub mod events;
pub mod explore;
pub mod filter;
pub mod simulate;
pub mod template;
