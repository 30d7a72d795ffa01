//! Privilege levels and their total order.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Recommended privilege level of the super user.
pub const SUPER_USER_LEVEL: i32 = 9999;

/// A named level in a total order.
///
/// A principal's privilege dominates a required privilege when its numeric
/// level is greater than or equal to the required level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Privilege {
    name: Cow<'static, str>,
    level: i32,
}

impl Privilege {
    pub fn new(name: impl Into<Cow<'static, str>>, level: i32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    /// The conventional super-user privilege.
    pub fn super_user() -> Self {
        Self::new("super-user", SUPER_USER_LEVEL)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl core::fmt::Display for Privilege {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}({})", self.name, self.level)
    }
}

/// Privilege ordering: does `user` dominate `required`?
///
/// True iff both sides are present and `user.level >= required.level`.
/// An absent side never dominates and is never dominated by absence.
pub fn dominates(user: Option<&Privilege>, required: Option<&Privilege>) -> bool {
    match (user, required) {
        (Some(user), Some(required)) => user.level >= required.level,
        _ => false,
    }
}
