//! Shared core types.
//!
//! Platform-agnostic; nothing here knows about a host UI.

pub mod errors;
