//! Runtime-type tokens and the guarded-target contract.

use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};

/// Token for a runtime type.
///
/// Works for concrete types and for `dyn Trait` interface markers alike, so
/// both can key the dynamic-association tables. The name rides along for
/// diagnostics only; identity is the `TypeId`.
#[derive(Debug, Copy, Clone)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An object placed under guard for a dynamic permission check.
///
/// Blanket-implemented for every `Any + Send + Sync` type: application
/// objects need no ceremony to become guarded targets. Association handlers
/// get back at the concrete type through [`GuardedTarget::as_any`].
pub trait GuardedTarget: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Token of the concrete runtime type, used to resolve the association
    /// handler.
    fn type_key(&self) -> TypeKey;

    /// Label identifying the target in audit records.
    fn audit_label(&self) -> &'static str;
}

impl<T: Any + Send + Sync> GuardedTarget for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn audit_label(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
