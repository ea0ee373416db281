//! # API Shared
//!
//! Shared wire types for the health information system APIs.
//!
//! Contains:
//! - Request bodies for create and partial-update calls
//! - The `{message}` envelope used for errors and acknowledgements
//! - `HealthService` for liveness checks
//!
//! Used by `api-rest`; kept free of storage concerns so another front-end can reuse it.

pub mod health;
pub mod lenient;
pub mod wire;

pub use health::{HealthRes, HealthService};
pub use wire::*;
