//! Per-organization identifier sequencing.
//!
//! Generates human-readable identifiers such as `ACM-EMP-2024-00001` from a
//! configurable pattern and an atomically incremented counter.
//!
//! # Modules
//!
//! - `category` - ID categories and their reset policies
//! - `error` - Pattern and sequencing error types
//! - `pattern` - Pattern parsing, validation and rendering
//! - `scope` - Counter scope derivation
//! - `store` - Storage seam for patterns and counters
//! - `memory` - In-memory store
//! - `service` - The `IdSequencer` service

pub mod category;
pub mod error;
pub mod memory;
pub mod pattern;
pub mod scope;
pub mod service;
pub mod store;

#[cfg(test)]
mod pattern_props;
#[cfg(test)]
mod tests;

pub use category::{IdCategory, ResetPolicy};
pub use error::{PatternError, SequenceError};
pub use memory::InMemorySequenceStore;
pub use pattern::{IdPattern, MAX_PATTERN_LENGTH, MAX_SEQUENCE_WIDTH, RenderContext, Segment};
pub use scope::SequenceScope;
pub use service::{EffectivePattern, GeneratedId, IdSequencer};
pub use store::{OrganizationProfile, SequenceStore};
