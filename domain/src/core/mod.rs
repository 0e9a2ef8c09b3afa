//! Core domain concepts shared across all subdomains.
//!
//! - [`confidence::Confidence`]: the ceiling-bounded confidence score
//! - [`error::DomainError`]: domain-level errors

pub mod confidence;
pub mod error;
