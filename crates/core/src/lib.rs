//! `warden-core` — pure domain primitives for access decisions.
//!
//! This crate contains the value types the decision engine reasons about
//! (principals, permissions, privileges, guarded-resource requirements) and
//! the audit/error models. No infrastructure concerns.

pub mod audit;
pub mod error;
pub mod guarded;
pub mod permission;
pub mod principal;
pub mod privilege;

pub use audit::AuditRecord;
pub use error::{AuthzError, AuthzResult};
pub use guarded::Guarded;
pub use permission::Permission;
pub use principal::{Principal, SYSTEM_PRINCIPAL};
pub use privilege::{dominates, Privilege, SUPER_USER_LEVEL};
