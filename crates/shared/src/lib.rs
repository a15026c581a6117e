//! Shared types, errors, and configuration for CompliHR.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Request/response payloads for the ID pattern endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod id_patterns;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, SequencingConfig, ServerConfig};
pub use error::AppError;
