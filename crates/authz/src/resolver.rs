//! Dynamic permission resolution.
//!
//! A permission flagged dynamic needs a per-instance association check:
//! "is this specific object associated with this specific principal?".
//! Handlers are registered per (permission, type) pair or as a type-wide
//! default, and looked up by walking the guarded type's declared ancestry.
//! Resolutions, including misses, are cached for the process lifetime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use warden_core::{AuthzError, AuthzResult, Permission, Principal};

use crate::target::{GuardedTarget, TypeKey};

/// Permission side of a resolver key.
///
/// The wildcard is its own variant rather than an absent name, so a
/// type-wide default registration can never be confused with a permission
/// that happens to be unnamed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermScope {
    Named(String),
    Any,
}

impl PermScope {
    fn named(permission: &Permission) -> Self {
        Self::Named(permission.name().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolverKey {
    scope: PermScope,
    type_key: TypeKey,
}

/// Decides whether a specific object instance is associated with a specific
/// principal. Supplied by application code, consulted fresh on every check.
pub trait DynamicAssociation: Send + Sync {
    fn is_associated(&self, target: &dyn GuardedTarget, principal: &Principal) -> bool;
}

/// Resolution of "no handler anywhere in the ancestry": never associated.
struct NoAssociation;

impl DynamicAssociation for NoAssociation {
    fn is_associated(&self, _target: &dyn GuardedTarget, _principal: &Principal) -> bool {
        false
    }
}

/// Declared ancestry of one type: its directly declared interfaces and an
/// optional parent. Built with [`TypeRelation`] and registered on the
/// resolver before decision traffic begins.
#[derive(Debug, Clone)]
pub struct TypeRelation {
    key: TypeKey,
    interfaces: Vec<TypeKey>,
    parent: Option<TypeKey>,
}

impl TypeRelation {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            interfaces: Vec::new(),
            parent: None,
        }
    }

    /// Declare a directly implemented interface (scanned before the parent).
    pub fn implements<I: ?Sized + 'static>(mut self) -> Self {
        self.interfaces.push(TypeKey::of::<I>());
        self
    }

    /// Declare the parent type the ancestry walk continues through.
    pub fn extends<P: ?Sized + 'static>(mut self) -> Self {
        self.parent = Some(TypeKey::of::<P>());
        self
    }
}

/// Process-wide resolver for dynamic permission associations.
///
/// The handler map doubles as the resolution cache: registrations and cached
/// resolutions (positive or miss) live in the same append-only table, so a
/// second lookup for any (permission, type) pair is a single map hit.
/// Registrations must complete before decision traffic begins; [`seal`]
/// makes that cutoff explicit.
///
/// [`seal`]: DynamicResolver::seal
pub struct DynamicResolver {
    entries: RwLock<HashMap<ResolverKey, Arc<dyn DynamicAssociation>>>,
    relations: RwLock<HashMap<TypeKey, TypeRelation>>,
    no_association: Arc<dyn DynamicAssociation>,
    sealed: AtomicBool,
}

impl Default for DynamicResolver {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            relations: RwLock::new(HashMap::new()),
            no_association: Arc::new(NoAssociation),
            sealed: AtomicBool::new(false),
        }
    }
}

impl DynamicResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an association handler for the type `T`.
    ///
    /// An empty permission list registers the handler as the type-wide
    /// default; otherwise one entry is registered per permission. The last
    /// registration for an identical key wins silently.
    pub fn register<T: ?Sized + 'static>(
        &self,
        association: Arc<dyn DynamicAssociation>,
        permissions: &[Permission],
    ) -> AuthzResult<()> {
        self.register_for(TypeKey::of::<T>(), association, permissions)
    }

    pub fn register_for(
        &self,
        type_key: TypeKey,
        association: Arc<dyn DynamicAssociation>,
        permissions: &[Permission],
    ) -> AuthzResult<()> {
        self.check_open("association registration", type_key)?;

        let mut entries = self.entries.write().unwrap();
        if permissions.is_empty() {
            entries.insert(
                ResolverKey {
                    scope: PermScope::Any,
                    type_key,
                },
                association,
            );
        } else {
            for permission in permissions {
                entries.insert(
                    ResolverKey {
                        scope: PermScope::named(permission),
                        type_key,
                    },
                    Arc::clone(&association),
                );
            }
        }
        Ok(())
    }

    /// Declare a type's ancestry for the resolution walk.
    pub fn declare(&self, relation: TypeRelation) -> AuthzResult<()> {
        self.check_open("type declaration", relation.key)?;
        self.relations.write().unwrap().insert(relation.key, relation);
        Ok(())
    }

    /// Reject further registration. Lookups that populated the cache before a
    /// late registration would otherwise silently shadow it (the table is
    /// never invalidated); sealing turns that race into an error.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    fn check_open(&self, what: &str, type_key: TypeKey) -> AuthzResult<()> {
        if self.is_sealed() {
            tracing::warn!(kind = what, guarded_type = type_key.name(), "resolver sealed, rejecting");
            return Err(AuthzError::Sealed);
        }
        Ok(())
    }

    /// Resolve the association handler for `(permission, type_key)`.
    ///
    /// Cache hit first (misses are cached too, as an always-false handler);
    /// otherwise walk the declared ancestry depth-first: at each level scan
    /// the type's directly declared interfaces plus the type itself for an
    /// exact permission entry, then repeat the scan with the wildcard key.
    /// The first match wins, so an exact entry outranks a wildcard at the
    /// same level, but a shallower wildcard beats a deeper exact entry. The
    /// result is cached under the original key before returning.
    pub fn resolve(&self, permission: &Permission, type_key: TypeKey) -> Arc<dyn DynamicAssociation> {
        let key = ResolverKey {
            scope: PermScope::named(permission),
            type_key,
        };

        if let Some(hit) = self.entries.read().unwrap().get(&key) {
            return Arc::clone(hit);
        }

        let (resolved, found) = match self.search(&key.scope, type_key) {
            Some(found) => (found, true),
            None => (Arc::clone(&self.no_association), false),
        };

        tracing::debug!(
            permission = permission.name(),
            guarded_type = type_key.name(),
            found,
            "caching dynamic association resolution"
        );
        self.entries
            .write()
            .unwrap()
            .entry(key)
            .or_insert_with(|| Arc::clone(&resolved));
        resolved
    }

    fn search(&self, scope: &PermScope, start: TypeKey) -> Option<Arc<dyn DynamicAssociation>> {
        let entries = self.entries.read().unwrap();
        let relations = self.relations.read().unwrap();

        let mut current = Some(start);
        while let Some(type_key) = current {
            let relation = relations.get(&type_key);

            // Directly declared interfaces first, then the type itself.
            let mut level: Vec<TypeKey> = relation
                .map(|r| r.interfaces.clone())
                .unwrap_or_default();
            level.push(type_key);

            for candidate in &level {
                let key = ResolverKey {
                    scope: scope.clone(),
                    type_key: *candidate,
                };
                if let Some(found) = entries.get(&key) {
                    return Some(Arc::clone(found));
                }
            }
            if *scope != PermScope::Any {
                for candidate in &level {
                    let key = ResolverKey {
                        scope: PermScope::Any,
                        type_key: *candidate,
                    };
                    if let Some(found) = entries.get(&key) {
                        return Some(Arc::clone(found));
                    }
                }
            }

            current = relation.and_then(|r| r.parent);
        }
        None
    }
}
