//! Core business logic for CompliHR.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and formatting live here.
//!
//! # Modules
//!
//! - `sequencing` - Per-organization human-readable ID generation

pub mod sequencing;
