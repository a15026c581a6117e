//! `SeaORM` entity definitions.

pub mod id_sequences;
pub mod organization_settings;
pub mod organizations;
