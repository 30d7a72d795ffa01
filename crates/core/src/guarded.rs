//! Guarded-resource requirements.

use serde::{Deserialize, Serialize};

use crate::{Permission, Privilege};

/// The protection requirement attached to a resource.
///
/// Constructed on demand at the decision boundary, never persisted. Either
/// side may be absent; a `Guarded` with neither requirement denies everyone
/// short of a privilege grant (there is nothing left to satisfy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guarded {
    permission: Option<Permission>,
    privilege: Option<Privilege>,
}

impl Guarded {
    pub fn new(permission: Option<Permission>, privilege: Option<Privilege>) -> Self {
        Self {
            permission,
            privilege,
        }
    }

    pub fn by_permission(permission: Permission) -> Self {
        Self::new(Some(permission), None)
    }

    pub fn by_privilege(privilege: Privilege) -> Self {
        Self::new(None, Some(privilege))
    }

    pub fn permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    pub fn privilege(&self) -> Option<&Privilege> {
        self.privilege.as_ref()
    }
}
