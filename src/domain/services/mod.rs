//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally belong to
//! a single entity.
//!
//! ## Services
//!
//! - **AccessPolicy**: owner-or-admin modification and friendship-gated
//!   profile visibility

mod access_policy;

pub use access_policy::*;
