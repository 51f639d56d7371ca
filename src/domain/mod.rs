//! # Domain Layer
//!
//! Transport DTOs, chat entities and the domain error type.
//! This layer is independent of external frameworks and infrastructure.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
