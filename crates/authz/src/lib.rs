//! `warden-authz` — access decision engine and authorization facade.
//!
//! Given a principal, a guarded resource, and a required permission or
//! privilege level, decide whether access is granted and record the
//! decision. Credential verification, permission storage, and audit
//! persistence stay behind the provider traits in [`providers`].

pub mod context;
pub mod facade;
pub mod providers;
pub mod resolver;
pub mod target;

mod engine;

pub use context::{AuthzContext, StandardContext};
pub use facade::{
    CombinedCheck, PermissionCheck, PermissionRef, PrivilegeCheck, PrivilegeRef, Warden,
};
pub use providers::{AuditSink, AuthorizationProvider, PersistenceProvider, TracingAuditSink};
pub use resolver::{DynamicAssociation, DynamicResolver, PermScope, TypeRelation};
pub use target::{GuardedTarget, TypeKey};
