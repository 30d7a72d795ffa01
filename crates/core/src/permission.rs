//! Permission capability.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A named capability.
///
/// A permission flagged `dynamic` is insufficient on its own: once possession
/// is confirmed, an additional per-instance association check decides whether
/// the specific guarded object belongs to the principal.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Permission {
    name: Cow<'static, str>,
    dynamic: bool,
}

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            dynamic: false,
        }
    }

    /// A permission requiring a per-instance association check.
    pub fn dynamic(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            dynamic: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

// Two permissions with the same name are the same capability; the dynamic
// flag is a property of the capability, not part of its identity.
impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Hash for Permission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}
