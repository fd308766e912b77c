//! `crowdfund-core` — shared identifiers and error model.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{OrganizationId, UserId};
