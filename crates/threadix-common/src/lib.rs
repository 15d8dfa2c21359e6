//! Threadix common types, errors, and configuration.
//!
//! This crate provides shared definitions used across all Threadix components.

pub mod config;
pub mod error;

pub use config::IndexConfig;
pub use error::{Result, ThreadixError};
