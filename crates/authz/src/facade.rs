//! Authorization facade.
//!
//! The public decision surface: permission-only, privilege-only, and
//! permission-or-privilege queries, each as a boolean `has_*` and an
//! enforcing `require_*`. Call shapes collapse into check structs instead of
//! an overload per argument combination; the ambient pieces (principal,
//! guarded target) come from the caller-supplied context.

use std::sync::Arc;

use warden_core::{
    dominates, AuditRecord, AuthzError, AuthzResult, Guarded, Permission, Principal, Privilege,
};

use crate::context::AuthzContext;
use crate::engine;
use crate::resolver::{DynamicAssociation, DynamicResolver, TypeRelation};
use crate::target::GuardedTarget;

/// A permission given directly or by name.
///
/// Names are resolved through the context's persistence provider; a name
/// that resolves to nothing degrades to "absent" with a warning, never an
/// error.
#[derive(Debug, Clone)]
pub enum PermissionRef {
    Direct(Permission),
    Named(String),
}

impl PermissionRef {
    /// The name as requested, resolvable or not. Used in audit records.
    pub fn name(&self) -> &str {
        match self {
            Self::Direct(p) => p.name(),
            Self::Named(n) => n,
        }
    }

    fn resolve(&self, ctx: &dyn AuthzContext) -> Option<Permission> {
        match self {
            Self::Direct(p) => Some(p.clone()),
            Self::Named(name) => {
                let found = ctx.persistence().find_permission(name);
                if found.is_none() {
                    tracing::warn!(permission = %name, "unknown permission name");
                }
                found
            }
        }
    }
}

impl From<Permission> for PermissionRef {
    fn from(value: Permission) -> Self {
        Self::Direct(value)
    }
}

impl From<&str> for PermissionRef {
    fn from(value: &str) -> Self {
        Self::Named(value.to_string())
    }
}

impl From<String> for PermissionRef {
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

/// A privilege given directly or by name.
#[derive(Debug, Clone)]
pub enum PrivilegeRef {
    Direct(Privilege),
    Named(String),
}

impl PrivilegeRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Direct(p) => p.name(),
            Self::Named(n) => n,
        }
    }

    fn resolve(&self, ctx: &dyn AuthzContext) -> Option<Privilege> {
        match self {
            Self::Direct(p) => Some(p.clone()),
            Self::Named(name) => {
                let found = ctx.persistence().find_privilege(name);
                if found.is_none() {
                    tracing::warn!(privilege = %name, "unknown privilege name");
                }
                found
            }
        }
    }
}

impl From<Privilege> for PrivilegeRef {
    fn from(value: Privilege) -> Self {
        Self::Direct(value)
    }
}

impl From<&str> for PrivilegeRef {
    fn from(value: &str) -> Self {
        Self::Named(value.to_string())
    }
}

impl From<String> for PrivilegeRef {
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

/// Arguments of a permission check. `allow_system` defaults to true.
#[derive(Clone)]
pub struct PermissionCheck {
    permission: PermissionRef,
    target: Option<Arc<dyn GuardedTarget>>,
    allow_system: bool,
}

impl PermissionCheck {
    pub fn new(permission: impl Into<PermissionRef>) -> Self {
        Self {
            permission: permission.into(),
            target: None,
            allow_system: true,
        }
    }

    /// Substitute this object as the guarded target for the duration of the
    /// check; the context's previous target is restored afterwards.
    pub fn target(mut self, target: Arc<dyn GuardedTarget>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn allow_system(mut self, allow: bool) -> Self {
        self.allow_system = allow;
        self
    }
}

/// Arguments of a privilege check. `allow_system` defaults to true.
#[derive(Clone)]
pub struct PrivilegeCheck {
    privilege: PrivilegeRef,
    allow_system: bool,
}

impl PrivilegeCheck {
    pub fn new(privilege: impl Into<PrivilegeRef>) -> Self {
        Self {
            privilege: privilege.into(),
            allow_system: true,
        }
    }

    pub fn allow_system(mut self, allow: bool) -> Self {
        self.allow_system = allow;
        self
    }
}

/// Arguments of a permission-or-privilege check.
///
/// At least one criterion must be present; checks with neither fail with
/// [`AuthzError::InvalidArgument`]. Unknown names degrade to an absent
/// criterion and fall through to the other one.
#[derive(Clone)]
pub struct CombinedCheck {
    permission: Option<PermissionRef>,
    privilege: Option<PrivilegeRef>,
    target: Option<Arc<dyn GuardedTarget>>,
    allow_system: bool,
}

impl Default for CombinedCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CombinedCheck {
    pub fn new() -> Self {
        Self {
            permission: None,
            privilege: None,
            target: None,
            allow_system: true,
        }
    }

    pub fn permission(mut self, permission: impl Into<PermissionRef>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn privilege(mut self, privilege: impl Into<PrivilegeRef>) -> Self {
        self.privilege = Some(privilege.into());
        self
    }

    pub fn target(mut self, target: Arc<dyn GuardedTarget>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn allow_system(mut self, allow: bool) -> Self {
        self.allow_system = allow;
        self
    }

    fn validate(&self) -> AuthzResult<()> {
        if self.permission.is_none() && self.privilege.is_none() {
            return Err(AuthzError::InvalidArgument(
                "combined check needs a permission or a privilege",
            ));
        }
        Ok(())
    }
}

/// The authorization facade.
///
/// Owns the process-wide dynamic-association resolver; share one `Warden`
/// (behind an `Arc` if needed) across the application. Contexts are per
/// logical operation and passed into every call.
#[derive(Default)]
pub struct Warden {
    resolver: DynamicResolver,
}

impl Warden {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolver(&self) -> &DynamicResolver {
        &self.resolver
    }

    /// Register a dynamic permission association for type `T`; an empty
    /// permission list makes it the type-wide default handler.
    pub fn register_dynamic_association<T: ?Sized + 'static>(
        &self,
        association: Arc<dyn DynamicAssociation>,
        permissions: &[Permission],
    ) -> AuthzResult<()> {
        self.resolver.register::<T>(association, permissions)
    }

    /// Declare a type's ancestry for association resolution.
    pub fn declare_type(&self, relation: TypeRelation) -> AuthzResult<()> {
        self.resolver.declare(relation)
    }

    /// Reject any further registration; call once startup wiring is done.
    pub fn seal(&self) {
        self.resolver.seal();
    }

    /// Does `principal` have access to the resource guarded by `guarded`?
    ///
    /// Pure decision, no audit recording.
    pub fn has_access_to(
        &self,
        principal: &Principal,
        guarded: &Guarded,
        ctx: &dyn AuthzContext,
    ) -> AuthzResult<bool> {
        engine::has_access_to(&self.resolver, principal, guarded, ctx)
    }

    pub fn has_permission(
        &self,
        check: &PermissionCheck,
        ctx: &dyn AuthzContext,
    ) -> AuthzResult<bool> {
        match ctx.current_principal(check.allow_system) {
            Some(user) => {
                self.permission_granted(&user, &check.permission, check.target.as_ref(), ctx)
            }
            None => Ok(false),
        }
    }

    /// Enforcing permission check: audits the outcome, then fails with
    /// [`AuthzError::NoAccess`] on denial.
    pub fn require_permission(
        &self,
        check: &PermissionCheck,
        ctx: &dyn AuthzContext,
    ) -> AuthzResult<()> {
        let user = ctx.current_principal(check.allow_system);
        let granted = match &user {
            Some(user) => {
                self.permission_granted(user, &check.permission, check.target.as_ref(), ctx)?
            }
            None => false,
        };

        let record = AuditRecord::new(
            check.target.as_ref().map(|t| t.audit_label().to_string()),
            user.as_ref().map(Principal::name).unwrap_or(""),
            Some(check.permission.name().to_string()),
            None,
            granted,
            None,
        );
        ctx.audit().record(&record);

        if granted { Ok(()) } else { Err(AuthzError::NoAccess) }
    }

    pub fn has_privilege(
        &self,
        check: &PrivilegeCheck,
        ctx: &dyn AuthzContext,
    ) -> AuthzResult<bool> {
        match ctx.current_principal(check.allow_system) {
            Some(user) => Ok(self.privilege_granted(&user, &check.privilege, ctx)),
            None => Ok(false),
        }
    }

    /// Enforcing privilege check. Privilege-only checks are silent: no audit
    /// record is emitted either way.
    pub fn require_privilege(
        &self,
        check: &PrivilegeCheck,
        ctx: &dyn AuthzContext,
    ) -> AuthzResult<()> {
        if self.has_privilege(check, ctx)? {
            Ok(())
        } else {
            Err(AuthzError::NoAccess)
        }
    }

    pub fn has_permission_or_privilege(
        &self,
        check: &CombinedCheck,
        ctx: &dyn AuthzContext,
    ) -> AuthzResult<bool> {
        check.validate()?;
        match ctx.current_principal(check.allow_system) {
            Some(user) => self.combined_granted(&user, check, ctx),
            None => Ok(false),
        }
    }

    /// Enforcing permission-or-privilege check: audits the outcome, then
    /// fails with [`AuthzError::NoAccess`] on denial.
    pub fn require_permission_or_privilege(
        &self,
        check: &CombinedCheck,
        ctx: &dyn AuthzContext,
    ) -> AuthzResult<()> {
        check.validate()?;
        let user = ctx.current_principal(check.allow_system);
        let granted = match &user {
            Some(user) => self.combined_granted(user, check, ctx)?,
            None => false,
        };

        let record = AuditRecord::new(
            check.target.as_ref().map(|t| t.audit_label().to_string()),
            user.as_ref().map(Principal::name).unwrap_or(""),
            check.permission.as_ref().map(|p| p.name().to_string()),
            check.privilege.as_ref().map(|p| p.name().to_string()),
            granted,
            None,
        );
        ctx.audit().record(&record);

        if granted { Ok(()) } else { Err(AuthzError::NoAccess) }
    }

    fn permission_granted(
        &self,
        user: &Principal,
        permission: &PermissionRef,
        target: Option<&Arc<dyn GuardedTarget>>,
        ctx: &dyn AuthzContext,
    ) -> AuthzResult<bool> {
        // The super-user bypass precedes even name resolution, so an
        // unresolvable permission name cannot lock the super user out.
        if ctx.super_user_bypass_allowed() && ctx.is_super_user(user) {
            return Ok(true);
        }

        let Some(permission) = permission.resolve(ctx) else {
            return Ok(false);
        };

        let swapped = target.map(|t| ctx.replace_guarded_target(Some(Arc::clone(t))));
        let outcome =
            engine::has_access_to(&self.resolver, user, &Guarded::by_permission(permission), ctx);
        // Restore the previous target on every exit path, error included.
        if let Some(previous) = swapped {
            ctx.replace_guarded_target(previous);
        }
        outcome
    }

    fn privilege_granted(
        &self,
        user: &Principal,
        privilege: &PrivilegeRef,
        ctx: &dyn AuthzContext,
    ) -> bool {
        let Some(required) = privilege.resolve(ctx) else {
            return false;
        };
        dominates(ctx.authorization().privilege_of(user).as_ref(), Some(&required))
    }

    fn combined_granted(
        &self,
        user: &Principal,
        check: &CombinedCheck,
        ctx: &dyn AuthzContext,
    ) -> AuthzResult<bool> {
        if let Some(privilege) = &check.privilege {
            if self.privilege_granted(user, privilege, ctx) {
                return Ok(true);
            }
        }
        if let Some(permission) = &check.permission {
            return self.permission_granted(user, permission, check.target.as_ref(), ctx);
        }
        Ok(false)
    }
}
