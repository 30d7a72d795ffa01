//! Decision context.
//!
//! One context per logical operation (request, transaction, job run). The
//! engine only reads from it, except for transiently swapping the current
//! guarded target around a nested check. A context instance must not be
//! shared between concurrent requests.

use std::sync::{Arc, Mutex};

use warden_core::{Principal, SUPER_USER_LEVEL};

use crate::providers::{AuditSink, AuthorizationProvider, PersistenceProvider};
use crate::target::GuardedTarget;

/// Ambient state of one logical operation, as seen by the decision engine.
pub trait AuthzContext {
    /// The principal decisions are made for.
    ///
    /// `allow_system` controls whether the system principal may stand in:
    /// when true and no principal is signed in, the system principal is
    /// returned; when false, a signed-in system principal is hidden.
    fn current_principal(&self, allow_system: bool) -> Option<Principal>;

    fn system_principal(&self) -> &Principal;

    /// Whether this principal is the super user.
    fn is_super_user(&self, principal: &Principal) -> bool;

    /// Whether the super-user bypass is enabled for this context.
    fn super_user_bypass_allowed(&self) -> bool;

    /// The object currently under guard, if any.
    fn guarded_target(&self) -> Option<Arc<dyn GuardedTarget>>;

    /// Swap the current guarded target, returning the previous one so the
    /// caller can restore it on every exit path.
    fn replace_guarded_target(
        &self,
        target: Option<Arc<dyn GuardedTarget>>,
    ) -> Option<Arc<dyn GuardedTarget>>;

    fn authorization(&self) -> &dyn AuthorizationProvider;
    fn persistence(&self) -> &dyn PersistenceProvider;
    fn audit(&self) -> &dyn AuditSink;
}

/// Stock [`AuthzContext`] implementation.
///
/// Holds the three providers, the system principal, the super-user policy
/// (by privilege level, [`SUPER_USER_LEVEL`] unless overridden), and the
/// per-operation principal and guarded-target slots.
pub struct StandardContext {
    authorization: Arc<dyn AuthorizationProvider>,
    persistence: Arc<dyn PersistenceProvider>,
    audit: Arc<dyn AuditSink>,
    system_principal: Principal,
    super_user_bypass: bool,
    super_user_level: i32,
    current_principal: Mutex<Option<Principal>>,
    guarded_target: Mutex<Option<Arc<dyn GuardedTarget>>>,
}

impl StandardContext {
    pub fn new(
        authorization: Arc<dyn AuthorizationProvider>,
        persistence: Arc<dyn PersistenceProvider>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            authorization,
            persistence,
            audit,
            system_principal: Principal::system(),
            super_user_bypass: false,
            super_user_level: SUPER_USER_LEVEL,
            current_principal: Mutex::new(None),
            guarded_target: Mutex::new(None),
        }
    }

    pub fn with_system_principal(mut self, principal: Principal) -> Self {
        self.system_principal = principal;
        self
    }

    /// Enable or disable the super-user bypass for permission checks.
    pub fn with_super_user_bypass(mut self, allowed: bool) -> Self {
        self.super_user_bypass = allowed;
        self
    }

    /// Override the privilege level at which a principal counts as super
    /// user.
    pub fn with_super_user_level(mut self, level: i32) -> Self {
        self.super_user_level = level;
        self
    }

    pub fn with_principal(self, principal: Principal) -> Self {
        self.set_principal(Some(principal));
        self
    }

    /// Install (or clear) the signed-in principal for this operation.
    pub fn set_principal(&self, principal: Option<Principal>) {
        *self.current_principal.lock().unwrap() = principal;
    }
}

impl AuthzContext for StandardContext {
    fn current_principal(&self, allow_system: bool) -> Option<Principal> {
        let current = self.current_principal.lock().unwrap().clone();
        match current {
            Some(p) if !allow_system && p.name() == self.system_principal.name() => None,
            Some(p) => Some(p),
            None if allow_system => Some(self.system_principal.clone()),
            None => None,
        }
    }

    fn system_principal(&self) -> &Principal {
        &self.system_principal
    }

    fn is_super_user(&self, principal: &Principal) -> bool {
        self.authorization
            .privilege_of(principal)
            .is_some_and(|p| p.level() >= self.super_user_level)
    }

    fn super_user_bypass_allowed(&self) -> bool {
        self.super_user_bypass
    }

    fn guarded_target(&self) -> Option<Arc<dyn GuardedTarget>> {
        self.guarded_target.lock().unwrap().clone()
    }

    fn replace_guarded_target(
        &self,
        target: Option<Arc<dyn GuardedTarget>>,
    ) -> Option<Arc<dyn GuardedTarget>> {
        std::mem::replace(&mut self.guarded_target.lock().unwrap(), target)
    }

    fn authorization(&self) -> &dyn AuthorizationProvider {
        self.authorization.as_ref()
    }

    fn persistence(&self) -> &dyn PersistenceProvider {
        self.persistence.as_ref()
    }

    fn audit(&self) -> &dyn AuditSink {
        self.audit.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use warden_core::{AuditRecord, Permission, Privilege};

    use super::*;

    struct NoGrants;

    impl AuthorizationProvider for NoGrants {
        fn privilege_of(&self, principal: &Principal) -> Option<Privilege> {
            (principal.name() == "root").then(Privilege::super_user)
        }

        fn all_permissions(&self, _principal: &Principal) -> HashSet<Permission> {
            HashSet::new()
        }
    }

    impl PersistenceProvider for NoGrants {
        fn find_permission(&self, _name: &str) -> Option<Permission> {
            None
        }

        fn find_privilege(&self, _name: &str) -> Option<Privilege> {
            None
        }
    }

    impl AuditSink for NoGrants {
        fn record(&self, _record: &AuditRecord) {}
    }

    fn context() -> StandardContext {
        let deps = Arc::new(NoGrants);
        StandardContext::new(deps.clone(), deps.clone(), deps)
    }

    #[test]
    fn system_principal_stands_in_when_allowed() {
        let ctx = context();
        assert_eq!(
            ctx.current_principal(true).as_ref().map(Principal::name),
            Some("__sys")
        );
        assert_eq!(ctx.current_principal(false), None);
    }

    #[test]
    fn signed_in_system_principal_is_hidden_when_not_allowed() {
        let ctx = context().with_principal(Principal::system());
        assert!(ctx.current_principal(true).is_some());
        assert_eq!(ctx.current_principal(false), None);
    }

    #[test]
    fn signed_in_principal_wins_over_system_fallback() {
        let ctx = context().with_principal(Principal::new("alice"));
        assert_eq!(
            ctx.current_principal(false).as_ref().map(Principal::name),
            Some("alice")
        );
    }

    #[test]
    fn replace_guarded_target_returns_previous() {
        struct Doc(&'static str);

        let ctx = context();
        assert!(ctx.replace_guarded_target(Some(Arc::new(Doc("a")))).is_none());

        let prev = ctx.replace_guarded_target(Some(Arc::new(Doc("b"))));
        let prev = prev.expect("first target should still be present");
        assert_eq!(prev.as_any().downcast_ref::<Doc>().unwrap().0, "a");

        ctx.replace_guarded_target(None);
        assert!(ctx.guarded_target().is_none());
    }

    #[test]
    fn super_user_is_decided_by_privilege_level() {
        let ctx = context().with_super_user_bypass(true);
        assert!(ctx.is_super_user(&Principal::new("root")));
        assert!(!ctx.is_super_user(&Principal::new("alice")));
    }
}
