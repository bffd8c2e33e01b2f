//! End-to-end workflows over in-memory storage.
//!
//! Verifies:
//! - The register/login scenario and first-user-is-admin assignment
//! - Route guarding for each role
//! - Post, object, user and profile workflows enforce their permissions

use std::sync::Arc;

use proptest::prelude::*;

use portal_app::{Portal, PortalError, ProfileUpdate};
use portal_auth::{ACCESS_DENIED_PATH, AuthError, AuthzError, GuardDecision, HOME_PATH, LOGIN_PATH, Permission};
use portal_content::{ObjectClass, ObjectDraft, PostDraft};
use portal_core::{CategoryId, DomainError, Repository, RoleId};
use portal_store::{InMemoryStorage, Keys, PortalStore, Storage};

fn open() -> (Arc<InMemoryStorage>, Portal) {
    let storage = Arc::new(InMemoryStorage::new());
    let store = PortalStore::new(storage.clone(), Keys::default());
    let (portal, _) = Portal::open(store).unwrap();
    (storage, portal)
}

/// Alice (admin) and Bob (reader) registered, nobody signed in.
fn with_alice_and_bob() -> (Arc<InMemoryStorage>, Portal) {
    let (storage, mut portal) = open();
    portal.register("Alice", "a@x.com", "pw123456").unwrap();
    portal.register("Bob", "b@x.com", "pw123456").unwrap();
    portal.logout();
    (storage, portal)
}

fn post_draft(published: bool) -> PostDraft {
    PostDraft {
        title: "Field report".to_string(),
        excerpt: "Notes from the latest recovery.".to_string(),
        content: "The recovery team reached the site at dawn and secured the item without incident."
            .to_string(),
        category_id: CategoryId::new("incident"),
        read_time: 3,
        published,
    }
}

fn object_draft(name: &str) -> ObjectDraft {
    ObjectDraft {
        name: name.to_string(),
        object_class: ObjectClass::Safe,
        description: "A mirror that reflects yesterday.".to_string(),
        containment: "Covered, in a locked room.".to_string(),
        procedures: "No more than one viewer at a time.".to_string(),
        discovery: "Found in an antique shop.".to_string(),
        addenda: None,
    }
}

fn promote_bob_to_researcher(portal: &mut Portal) {
    portal.login("a@x.com", "pw123456").unwrap();
    let bob = portal
        .list_users()
        .unwrap()
        .into_iter()
        .find(|u| u.email == "b@x.com")
        .unwrap();
    portal.change_user_role(&bob.id, &RoleId::new("researcher")).unwrap();
    portal.logout();
}

#[test]
fn registration_and_login_scenario() {
    let (storage, mut portal) = open();

    let alice = portal.register("Alice", "a@x.com", "pw123456").unwrap();
    assert_eq!(alice.role.id.as_str(), "admin");
    let bob = portal.register("Bob", "b@x.com", "pw123456").unwrap();
    assert_eq!(bob.role.id.as_str(), "reader");

    let users_before = storage.get_item("sce-users").unwrap();
    let state_before = portal.session().state().clone();
    assert_eq!(
        portal.login("a@x.com", "wrong"),
        Err(PortalError::Auth(AuthError::InvalidCredentials))
    );
    assert_eq!(storage.get_item("sce-users").unwrap(), users_before);
    assert_eq!(*portal.session().state(), state_before);

    portal.login("a@x.com", "pw123456").unwrap();
    assert!(portal.session().check_permission(&Permission::ALL));

    portal.login("b@x.com", "pw123456").unwrap();
    assert!(!portal.session().check_permission(&Permission::ALL));
    assert!(portal.session().check_permission(&Permission::READ_PUBLIC));

    portal.logout();
    portal.reload();
    assert!(!portal.session().is_authenticated());
}

#[test]
fn navigation_per_role() {
    let (_, mut portal) = with_alice_and_bob();

    assert_eq!(
        portal.navigate("/admin/users"),
        GuardDecision::RedirectToLogin {
            return_to: "/admin/users".to_string()
        }
    );

    portal.login("b@x.com", "pw123456").unwrap();
    assert_eq!(portal.navigate("/admin/users"), GuardDecision::AccessDenied);
    assert_eq!(portal.navigate("/objects/create"), GuardDecision::AccessDenied);
    assert_eq!(portal.navigate("/objects/sce-001"), GuardDecision::Render);

    let explanation = portal.explain(&Permission::CREATE_OBJECT);
    assert!(!explanation.granted);

    portal.login("a@x.com", "pw123456").unwrap();
    assert_eq!(portal.navigate("/admin/users"), GuardDecision::Render);
}

#[test]
fn login_returns_to_the_guarded_location() {
    let (_, mut portal) = with_alice_and_bob();

    let decision = portal.navigate("/admin/users?tab=roles");
    assert_eq!(decision.redirect_target(), Some(LOGIN_PATH));
    let GuardDecision::RedirectToLogin { return_to } = decision else {
        panic!("expected a login redirect");
    };

    let destination = portal
        .login_and_return("a@x.com", "pw123456", Some(&return_to))
        .unwrap();
    assert_eq!(destination, "/admin/users?tab=roles");
    assert_eq!(portal.navigate(&destination), GuardDecision::Render);

    // Off-site or missing targets fall back to home.
    for target in [None, Some("https://evil.example"), Some("//evil.example"), Some("/login")] {
        let destination = portal.login_and_return("b@x.com", "pw123456", target).unwrap();
        assert_eq!(destination, HOME_PATH, "{target:?}");
    }
    assert_eq!(portal.navigate("/admin").redirect_target(), Some(ACCESS_DENIED_PATH));

    assert!(portal.login_and_return("b@x.com", "wrong", Some("/profile")).is_err());
}

#[test]
fn stored_object_at_max_number_blocks_creation_without_panicking() {
    let (_, mut portal) = with_alice_and_bob();
    let alice = portal.login("a@x.com", "pw123456").unwrap();

    let draft = object_draft("Last");
    let last = portal_content::ContentObject::create(
        portal_core::ObjectId::new("sce-4294967295"),
        &draft,
        alice.id,
        chrono::Utc::now(),
    )
    .unwrap();
    portal.store().objects().add(last).unwrap();

    assert!(matches!(
        portal.create_object(&draft),
        Err(PortalError::Domain(DomainError::InvariantViolation(_)))
    ));
    assert_eq!(portal.list_objects().unwrap().len(), 1);
}

#[test]
fn post_lifecycle() {
    let (_, mut portal) = with_alice_and_bob();

    // Readers cannot author.
    portal.login("b@x.com", "pw123456").unwrap();
    assert_eq!(
        portal.create_post(&post_draft(true)),
        Err(PortalError::Authz(AuthzError::Forbidden("create:post".to_string())))
    );

    portal.login("a@x.com", "pw123456").unwrap();
    let published = portal.create_post(&post_draft(true)).unwrap();
    let draft = portal.create_post(&post_draft(false)).unwrap();
    assert_eq!(published.author_name, "Alice");
    assert_eq!(portal.list_posts().unwrap().len(), 2);

    let mut bad = post_draft(true);
    bad.category_id = CategoryId::new("gossip");
    assert!(matches!(
        portal.create_post(&bad),
        Err(PortalError::Domain(DomainError::Validation(_)))
    ));

    portal.login("b@x.com", "pw123456").unwrap();
    assert_eq!(portal.list_posts().unwrap(), vec![published.clone()]);
    assert!(matches!(
        portal.post_detail(&draft.id),
        Err(PortalError::NotFound { kind: "post", .. })
    ));
    assert!(portal.post_detail(&published.id).is_ok());
    assert!(matches!(
        portal.delete_post(&published.id),
        Err(PortalError::Authz(_))
    ));

    portal.logout();
    assert_eq!(portal.list_posts().unwrap().len(), 1);

    portal.login("a@x.com", "pw123456").unwrap();
    let mut edit = post_draft(true);
    edit.title = "Field report (final)".to_string();
    let updated = portal.update_post(&draft.id, &edit).unwrap();
    assert!(updated.published);
    assert_eq!(updated.date, draft.date);

    portal.delete_post(&draft.id).unwrap();
    assert!(matches!(
        portal.delete_post(&draft.id),
        Err(PortalError::NotFound { .. })
    ));
}

#[test]
fn researcher_edits_any_post_but_cannot_delete() {
    let (_, mut portal) = with_alice_and_bob();
    portal.login("a@x.com", "pw123456").unwrap();
    let post = portal.create_post(&post_draft(true)).unwrap();
    portal.logout();

    promote_bob_to_researcher(&mut portal);
    portal.login("b@x.com", "pw123456").unwrap();

    let mut edit = post_draft(false);
    edit.title = "Retitled".to_string();
    assert_eq!(portal.update_post(&post.id, &edit).unwrap().title, "Retitled");
    assert!(matches!(portal.delete_post(&post.id), Err(PortalError::Authz(_))));
}

#[test]
fn object_ids_and_permissions() {
    let (_, mut portal) = with_alice_and_bob();

    portal.login("b@x.com", "pw123456").unwrap();
    assert!(matches!(
        portal.create_object(&object_draft("Mirror")),
        Err(PortalError::Authz(AuthzError::Forbidden(_)))
    ));

    portal.login("a@x.com", "pw123456").unwrap();
    let first = portal.create_object(&object_draft("Mirror")).unwrap();
    let second = portal.create_object(&object_draft("Lamp")).unwrap();
    assert_eq!(first.id.as_str(), "sce-001");
    assert_eq!(second.id.as_str(), "sce-002");

    portal.delete_object(&first.id).unwrap();
    let third = portal.create_object(&object_draft("Chair")).unwrap();
    assert_eq!(third.id.as_str(), "sce-003");

    let mut edit = object_draft("Lamp");
    edit.object_class = ObjectClass::Keter;
    let updated = portal.update_object(&second.id, &edit).unwrap();
    assert_eq!(updated.object_class, ObjectClass::Keter);
    assert!(updated.updated_at >= updated.created_at);

    // Listing and detail are public.
    portal.logout();
    let ids: Vec<String> = portal
        .list_objects()
        .unwrap()
        .into_iter()
        .map(|o| o.id.to_string())
        .collect();
    assert_eq!(ids, vec!["sce-002", "sce-003"]);
    assert_eq!(portal.object_detail(&third.id).unwrap().name, "Chair");
}

#[test]
fn user_administration() {
    let (_, mut portal) = with_alice_and_bob();

    portal.login("b@x.com", "pw123456").unwrap();
    assert!(matches!(portal.list_users(), Err(PortalError::Authz(_))));

    portal.login("a@x.com", "pw123456").unwrap();
    let users = portal.list_users().unwrap();
    let alice = users.iter().find(|u| u.email == "a@x.com").unwrap().clone();
    let bob = users.iter().find(|u| u.email == "b@x.com").unwrap().clone();

    assert!(matches!(
        portal.change_user_role(&bob.id, &RoleId::new("overlord")),
        Err(PortalError::NotFound { kind: "role", .. })
    ));
    assert_eq!(portal.delete_user(&alice.id), Err(PortalError::SelfDeletion));

    portal.delete_user(&bob.id).unwrap();
    assert_eq!(portal.list_users().unwrap().len(), 1);
    assert_eq!(
        portal.login("b@x.com", "pw123456").unwrap_err(),
        PortalError::Auth(AuthError::InvalidCredentials)
    );
}

#[test]
fn demoting_yourself_takes_effect_immediately() {
    let (_, mut portal) = with_alice_and_bob();
    let alice = portal.login("a@x.com", "pw123456").unwrap();

    portal.change_user_role(&alice.id, &RoleId::new("reader")).unwrap();
    assert!(!portal.session().check_permission(&Permission::ALL));
    assert_eq!(
        portal.session().state().role.as_ref().map(|r| r.id.as_str()),
        Some("reader")
    );
}

#[test]
fn profile_update() {
    let (storage, mut portal) = with_alice_and_bob();

    let update = ProfileUpdate {
        name: "Alice Liddell".to_string(),
        current_password: "pw123456".to_string(),
        new_password: Some("newpass1".to_string()),
        confirm_password: Some("newpass1".to_string()),
    };
    assert_eq!(
        portal.update_profile(&update),
        Err(PortalError::Authz(AuthzError::Unauthenticated))
    );

    portal.login("a@x.com", "pw123456").unwrap();

    let wrong = ProfileUpdate {
        current_password: "nope".to_string(),
        ..update.clone()
    };
    assert!(matches!(
        portal.update_profile(&wrong),
        Err(PortalError::Domain(DomainError::Validation(_)))
    ));

    let mismatched = ProfileUpdate {
        confirm_password: Some("different".to_string()),
        ..update.clone()
    };
    assert!(portal.update_profile(&mismatched).is_err());

    let user = portal.update_profile(&update).unwrap();
    assert_eq!(user.name, "Alice Liddell");
    assert!(storage.get_item("sce-current-user").unwrap().unwrap().contains("Alice Liddell"));

    portal.logout();
    assert!(portal.login("a@x.com", "pw123456").is_err());
    assert!(portal.login("a@x.com", "newpass1").is_ok());
}

#[test]
fn dangling_role_fails_closed() {
    let (_, mut portal) = with_alice_and_bob();
    portal.login("b@x.com", "pw123456").unwrap();

    portal.store().roles().delete(&RoleId::new("reader")).unwrap();
    for permission in Permission::VOCABULARY {
        assert!(!portal.session().check_permission(&permission));
    }

    portal.reload();
    assert!(!portal.session().is_authenticated());
}

#[test]
fn file_backed_portal_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portal.json");

    let open_file = || {
        let storage = Arc::new(portal_store::FileStorage::open(&path).unwrap());
        Portal::open(PortalStore::new(storage, Keys::default())).unwrap()
    };

    let (mut portal, report) = open_file();
    assert!(!report.is_empty());
    portal.register("Alice", "a@x.com", "pw123456").unwrap();
    drop(portal);

    let (portal, report) = open_file();
    assert!(report.is_empty());
    assert!(portal.session().is_authenticated());
    assert_eq!(portal.store().users().list().unwrap().len(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    /// Only the first account is ever an administrator, whatever happens to
    /// the accounts registered after it.
    #[test]
    fn only_first_registration_is_admin(ops in proptest::collection::vec(any::<bool>(), 1..12)) {
        let (_, mut portal) = open();
        let first = portal.register("Admin", "admin@x.com", "pw123456").unwrap();
        prop_assert_eq!(first.role.id.as_str(), "admin");

        for (i, delete_latest) in ops.into_iter().enumerate() {
            let reg = portal
                .register("Member", &format!("m{i}@x.com"), "pw123456")
                .unwrap();
            prop_assert_eq!(reg.role.id.as_str(), "reader");

            if delete_latest {
                portal.login("admin@x.com", "pw123456").unwrap();
                portal.delete_user(&reg.user.id).unwrap();
            }
        }
    }
}
