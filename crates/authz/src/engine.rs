//! Access decision engine.
//!
//! Pure composition of privilege ordering, permission-set membership, and
//! dynamic association resolution. No audit recording happens here; that is
//! the facade's job.

use warden_core::{dominates, AuthzError, AuthzResult, Guarded, Principal};

use crate::context::AuthzContext;
use crate::resolver::DynamicResolver;

/// Decide whether `principal` has access to `guarded`, short-circuiting in
/// order: privilege dominance, required-permission presence, permission-set
/// membership, dynamic flag / system principal, per-instance association.
pub(crate) fn has_access_to(
    resolver: &DynamicResolver,
    principal: &Principal,
    guarded: &Guarded,
    ctx: &dyn AuthzContext,
) -> AuthzResult<bool> {
    let auth = ctx.authorization();

    let user_privilege = auth.privilege_of(principal);
    if dominates(user_privilege.as_ref(), guarded.privilege()) {
        return Ok(true);
    }

    let Some(required) = guarded.permission() else {
        // No permission requirement: nothing left to satisfy.
        return Ok(false);
    };

    if !auth.all_permissions(principal).contains(required) {
        return Ok(false);
    }

    // Possession confirmed. The system principal skips the per-instance
    // association step.
    if !required.is_dynamic() || principal.name() == ctx.system_principal().name() {
        return Ok(true);
    }

    let Some(target) = ctx.guarded_target() else {
        return Err(AuthzError::MissingTarget);
    };
    let association = resolver.resolve(required, target.type_key());
    Ok(association.is_associated(target.as_ref(), principal))
}
