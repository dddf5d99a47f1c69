//! Shared types, errors, and configuration for Grand Livre.
//!
//! This crate provides common types used across all other crates:
//! - Amount helpers with decimal precision
//! - Typed IDs for journal entries and lines
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
