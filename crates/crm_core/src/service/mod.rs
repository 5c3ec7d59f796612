//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep view and CLI layers decoupled from storage details.

pub mod dashboard;
pub mod entity_queries;
pub mod funnel_service;
pub mod resource_service;
pub mod sms_service;
