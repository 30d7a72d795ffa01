//! Capability contracts consumed by the decision engine.
//!
//! Credential verification, storage of permissions/privileges, and audit
//! persistence are external collaborators; the engine only specifies their
//! seams.

use std::collections::HashSet;

use warden_core::{AuditRecord, Permission, Principal, Privilege};

/// Ground truth for what a principal holds.
pub trait AuthorizationProvider: Send + Sync {
    /// The principal's resolved privilege, if any.
    fn privilege_of(&self, principal: &Principal) -> Option<Privilege>;

    /// The complete permission set granted to the principal. Must be total
    /// for any principal; an empty set is a valid answer.
    fn all_permissions(&self, principal: &Principal) -> HashSet<Permission>;
}

/// Name-based lookup of permission and privilege definitions.
///
/// A name that does not resolve is not an error: the facade degrades it to
/// "absent" with a warning diagnostic.
pub trait PersistenceProvider: Send + Sync {
    fn find_permission(&self, name: &str) -> Option<Permission>;
    fn find_privilege(&self, name: &str) -> Option<Privilege>;
}

/// Write-only sink for decision records.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: &AuditRecord);
}

/// Audit sink emitting each record as a structured `tracing` event.
///
/// Suitable as a default when decisions should land in the application log
/// rather than a dedicated store.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        let payload = serde_json::to_string(record).unwrap_or_default();
        if record.granted {
            tracing::info!(
                principal = %record.principal,
                granted = true,
                %payload,
                "access decision"
            );
        } else {
            tracing::warn!(
                principal = %record.principal,
                granted = false,
                %payload,
                "access decision"
            );
        }
    }
}
