//! Canonical CRM record schemas.
//!
//! # Responsibility
//! - Define one typed record shape per CRM entity.
//! - Own defaults, required-field validation and shallow patch merging.
//! - Normalize loosely-typed inbound data at deserialization time.
//!
//! # Invariants
//! - Every record is identified by a `RecordId` that is unique inside its
//!   collection and never changes after creation.
//! - Patches overwrite only the fields they carry.
//! - Only `normalize` knows about legacy field spellings.

pub mod appointment;
pub mod campaign;
pub mod contact;
pub mod form;
pub mod landing_page;
pub mod normalize;
pub mod record;
pub mod section_block;
pub mod sms;
pub mod social_post;
pub mod workflow;
