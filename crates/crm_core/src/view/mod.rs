//! Headless view state for CRM screens.
//!
//! # Responsibility
//! - Hold per-screen state that a UI shell renders: list loading, search,
//!   selection, pipeline columns and editor drafts.
//! - Talk to storage only through `ResourceService`.
//!
//! # Invariants
//! - A failed call leaves previously loaded records in place or rolls
//!   local edits back.

pub mod editor;
pub mod filter;
pub mod list_view;
pub mod pipeline;
