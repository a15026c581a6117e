//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod id_sequence;
pub mod organization;
pub mod organization_settings;

pub use id_sequence::IdSequenceRepository;
pub use organization::{CreateOrganizationInput, OrganizationError, OrganizationRepository};
pub use organization_settings::OrganizationSettingsRepository;
