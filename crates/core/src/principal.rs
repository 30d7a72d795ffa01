//! Principal identity.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Recommended name of the system principal.
///
/// The system principal represents the application itself acting without a
/// signed-in user (background jobs, scheduled maintenance). Contexts may use
/// any name, but this is the conventional one.
pub const SYSTEM_PRINCIPAL: &str = "__sys";

/// An authenticated actor.
///
/// Principals are issued by the authentication subsystem and referenced,
/// never mutated, by the decision engine. Only the stable name matters at
/// this layer; account state lives with its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(Cow<'static, str>);

impl Principal {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The system principal under its conventional name.
    pub fn system() -> Self {
        Self(Cow::Borrowed(SYSTEM_PRINCIPAL))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
