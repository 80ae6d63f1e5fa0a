//! Shared types for the avatar-recruiter workspace: the
//! error enum, the Bey data model, TOML configuration and structured
//! trace events.

pub mod config;
pub mod error;
pub mod trace;
pub mod types;

pub use error::{Error, Result};
