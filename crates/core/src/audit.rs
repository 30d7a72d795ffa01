//! Audit record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded access decision.
///
/// Emitted exactly once per enforcing decision, regardless of outcome, and
/// never read back by the decision engine. The permission/privilege names are
/// the names as requested by the caller, even when they failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    /// Label of the guarded target, when the check named one.
    pub target: Option<String>,
    /// Name of the principal the decision was made for; empty when no
    /// principal could be resolved.
    pub principal: String,
    pub permission: Option<String>,
    pub privilege: Option<String>,
    pub granted: bool,
    pub detail: Option<String>,
}

impl AuditRecord {
    pub fn new(
        target: Option<String>,
        principal: impl Into<String>,
        permission: Option<String>,
        privilege: Option<String>,
        granted: bool,
        detail: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            at: Utc::now(),
            target,
            principal: principal.into(),
            permission,
            privilege,
            granted,
            detail,
        }
    }
}
