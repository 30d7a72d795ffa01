//! Black-box flow through the facade: a document store wires the providers,
//! registers type relations and dynamic associations at startup, seals the
//! resolver, then serves access checks.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use warden_authz::{
    AuditSink, AuthorizationProvider, CombinedCheck, DynamicAssociation, GuardedTarget,
    PermissionCheck, PersistenceProvider, StandardContext, TypeRelation, Warden,
};
use warden_core::{AuditRecord, AuthzError, Permission, Principal, Privilege};

struct Document {
    owner: Mutex<String>,
}

impl Document {
    fn owned_by(owner: &str) -> Arc<Self> {
        Arc::new(Self {
            owner: Mutex::new(owner.to_string()),
        })
    }
}

/// Interface marker: anything with an owner.
trait Owned {}

struct Directory;

struct OwnerAssociation;

impl DynamicAssociation for OwnerAssociation {
    fn is_associated(&self, target: &dyn GuardedTarget, principal: &Principal) -> bool {
        target
            .as_any()
            .downcast_ref::<Document>()
            .is_some_and(|doc| *doc.owner.lock().unwrap() == principal.name())
    }
}

/// Directory listings are visible to everyone holding the permission.
struct AlwaysAssociated;

impl DynamicAssociation for AlwaysAssociated {
    fn is_associated(&self, _target: &dyn GuardedTarget, _principal: &Principal) -> bool {
        true
    }
}

#[derive(Default)]
struct DocStore {
    privileges: HashMap<String, Privilege>,
    grants: HashMap<String, HashSet<Permission>>,
    catalog: HashMap<String, Permission>,
    records: Mutex<Vec<AuditRecord>>,
}

impl AuthorizationProvider for DocStore {
    fn privilege_of(&self, principal: &Principal) -> Option<Privilege> {
        self.privileges.get(principal.name()).cloned()
    }

    fn all_permissions(&self, principal: &Principal) -> HashSet<Permission> {
        self.grants.get(principal.name()).cloned().unwrap_or_default()
    }
}

impl PersistenceProvider for DocStore {
    fn find_permission(&self, name: &str) -> Option<Permission> {
        self.catalog.get(name).cloned()
    }

    fn find_privilege(&self, name: &str) -> Option<Privilege> {
        (name == "admin").then(|| Privilege::new("admin", 90))
    }
}

impl AuditSink for DocStore {
    fn record(&self, record: &AuditRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

fn edit_doc() -> Permission {
    Permission::dynamic("edit-doc")
}

fn list_dir() -> Permission {
    Permission::dynamic("list-dir")
}

fn store() -> Arc<DocStore> {
    let mut store = DocStore::default();
    store
        .privileges
        .insert("carol".to_string(), Privilege::new("admin", 90));
    store
        .privileges
        .insert("root".to_string(), Privilege::super_user());
    store.grants.insert(
        "bob".to_string(),
        HashSet::from([edit_doc(), list_dir()]),
    );
    store
        .grants
        .insert("alice".to_string(), HashSet::from([edit_doc()]));
    store
        .catalog
        .insert("edit-doc".to_string(), edit_doc());
    store
        .catalog
        .insert("list-dir".to_string(), list_dir());
    Arc::new(store)
}

/// Startup wiring: owner association for documents via the `Owned` interface,
/// a type-wide default for directories, then seal.
fn warden() -> Warden {
    let warden = Warden::new();
    warden
        .declare_type(TypeRelation::of::<Document>().implements::<dyn Owned>())
        .unwrap();
    warden
        .register_dynamic_association::<dyn Owned>(Arc::new(OwnerAssociation), &[edit_doc()])
        .unwrap();
    warden
        .register_dynamic_association::<Directory>(Arc::new(AlwaysAssociated), &[])
        .unwrap();
    warden.seal();
    warden
}

fn ctx_for(store: &Arc<DocStore>, principal: &str) -> StandardContext {
    StandardContext::new(store.clone(), store.clone(), store.clone())
        .with_principal(Principal::new(principal.to_string()))
}

#[test]
fn ownership_decides_and_is_not_cached_per_object() {
    let store = store();
    let warden = warden();
    let ctx = ctx_for(&store, "bob");

    let doc = Document::owned_by("alice");
    let check = PermissionCheck::new("edit-doc").target(doc.clone());
    assert_eq!(warden.has_permission(&check, &ctx), Ok(false));

    // Ownership changes; the association handler is consulted fresh.
    *doc.owner.lock().unwrap() = "bob".to_string();
    assert_eq!(warden.has_permission(&check, &ctx), Ok(true));
}

#[test]
fn association_is_found_through_the_declared_interface() {
    let store = store();
    let warden = warden();
    let ctx = ctx_for(&store, "alice");

    // Registered on `dyn Owned`, resolved for `Document`.
    let check = PermissionCheck::new(edit_doc()).target(Document::owned_by("alice"));
    assert_eq!(warden.has_permission(&check, &ctx), Ok(true));
}

#[test]
fn type_wide_default_serves_any_permission_on_that_type() {
    let store = store();
    let warden = warden();
    let ctx = ctx_for(&store, "bob");

    let check = PermissionCheck::new(list_dir()).target(Arc::new(Directory));
    assert_eq!(warden.has_permission(&check, &ctx), Ok(true));
}

#[test]
fn registration_after_seal_is_rejected() {
    let warden = warden();
    assert_eq!(
        warden.register_dynamic_association::<Directory>(Arc::new(AlwaysAssociated), &[]),
        Err(AuthzError::Sealed)
    );
}

#[test]
fn enforcing_flow_audits_each_decision_once() {
    // Tracing output (RUST_LOG-gated) for the decision diagnostics.
    warden_observability::init();

    let store = store();
    let warden = warden();
    let ctx = ctx_for(&store, "bob");

    let doc = Document::owned_by("bob");
    warden
        .require_permission(&PermissionCheck::new("edit-doc").target(doc.clone()), &ctx)
        .unwrap();

    *doc.owner.lock().unwrap() = "alice".to_string();
    assert_eq!(
        warden.require_permission(&PermissionCheck::new("edit-doc").target(doc), &ctx),
        Err(AuthzError::NoAccess)
    );

    let records = store.records.lock().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].granted);
    assert!(!records[1].granted);
    assert!(records.iter().all(|r| {
        r.principal == "bob" && r.permission.as_deref() == Some("edit-doc")
    }));
}

#[test]
fn admin_privilege_carries_a_combined_check_past_a_missing_grant() {
    let store = store();
    let warden = warden();
    let ctx = ctx_for(&store, "carol");

    // Carol holds no permissions at all.
    let check = CombinedCheck::new().permission("edit-doc").privilege("admin");
    warden.require_permission_or_privilege(&check, &ctx).unwrap();

    let records = store.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].granted);
    assert_eq!(records[0].privilege.as_deref(), Some("admin"));
}

#[test]
fn super_user_bypass_is_a_context_property() {
    let store = store();
    let warden = warden();

    let bypass_ctx = ctx_for(&store, "root").with_super_user_bypass(true);
    let plain_ctx = ctx_for(&store, "root");

    let check = PermissionCheck::new("edit-doc");
    assert_eq!(warden.has_permission(&check, &bypass_ctx), Ok(true));
    // Root holds no permissions; without the bypass the check is a real one.
    assert_eq!(warden.has_permission(&check, &plain_ctx), Ok(false));
}
