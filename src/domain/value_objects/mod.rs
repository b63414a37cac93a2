//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **PageRequest / Page**: 1-based pagination and the result envelope

mod pagination;

pub use pagination::*;
