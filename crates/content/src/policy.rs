//! Content access policy.
//!
//! Route access is decided by the guard; this module answers the finer
//! questions a workflow asks about a specific record (may this viewer see a
//! draft, edit this post, delete anything).

use portal_auth::{AuthzError, Permission, Role, SessionResolver, SessionStore, User, authorize};
use portal_core::{Repository, UserId};

use crate::Post;

/// Whoever is looking at content: a live session or a resolved actor.
pub trait Viewer {
    /// `None` when nobody is signed in.
    fn viewer_id(&self) -> Option<&UserId>;

    /// The signed-in viewer's role, if it resolves.
    fn role(&self) -> Option<Role>;

    fn can(&self, permission: &Permission) -> bool {
        require(self, permission).is_ok()
    }
}

impl<U, R, S> Viewer for SessionResolver<U, R, S>
where
    U: Repository<User>,
    R: Repository<Role>,
    S: SessionStore,
{
    fn viewer_id(&self) -> Option<&UserId> {
        self.current_user_id()
    }

    fn role(&self) -> Option<Role> {
        self.current_role()
    }
}

/// A viewer resolved ahead of time (tests, batch jobs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Option<UserId>,
    pub role: Option<Role>,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id: Some(id),
            role: Some(role),
        }
    }

    pub fn anonymous() -> Self {
        Self { id: None, role: None }
    }
}

impl Viewer for Actor {
    fn viewer_id(&self) -> Option<&UserId> {
        self.id.as_ref()
    }

    fn role(&self) -> Option<Role> {
        self.id.as_ref().and(self.role.clone())
    }
}

/// Fail with `Unauthenticated` or `Forbidden` unless `permission` is held.
///
/// A viewer whose role does not resolve counts as unauthenticated.
pub fn require<V: Viewer + ?Sized>(viewer: &V, permission: &Permission) -> Result<(), AuthzError> {
    authorize(viewer.role().as_ref(), permission)
}

/// Drafts are visible to their author and to `all` holders only.
pub fn can_view_post<V: Viewer + ?Sized>(viewer: &V, post: &Post) -> bool {
    post.published
        || viewer.can(&Permission::ALL)
        || viewer.viewer_id().is_some_and(|id| post.is_authored_by(id))
}

/// `edit:post` covers any post; `edit:own:post` only the viewer's own.
pub fn can_edit_post<V: Viewer + ?Sized>(viewer: &V, post: &Post) -> bool {
    if viewer.can(&Permission::EDIT_POST) {
        return true;
    }
    viewer.can(&Permission::EDIT_OWN_POST)
        && viewer.viewer_id().is_some_and(|id| post.is_authored_by(id))
}

pub fn require_post_edit<V: Viewer + ?Sized>(viewer: &V, post: &Post) -> Result<(), AuthzError> {
    if viewer.viewer_id().is_none() {
        return Err(AuthzError::Unauthenticated);
    }
    if can_edit_post(viewer, post) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(Permission::EDIT_POST.as_str().to_string()))
    }
}

/// Deleting posts and objects, and managing users, is reserved to `all`.
pub fn can_manage<V: Viewer + ?Sized>(viewer: &V) -> bool {
    viewer.can(&Permission::ALL)
}

/// The post list: `all` holders see drafts too, everyone else only published posts.
pub fn visible_posts<V: Viewer + ?Sized>(viewer: &V, posts: Vec<Post>) -> Vec<Post> {
    if can_manage(viewer) {
        return posts;
    }
    posts.into_iter().filter(|p| p.published).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portal_core::{CategoryId, PostId};
    use proptest::prelude::*;

    fn role(id: &str) -> Role {
        Role::defaults()
            .into_iter()
            .find(|r| r.id.as_str() == id)
            .unwrap()
    }

    fn post(author: &str, published: bool) -> Post {
        Post {
            id: PostId::new(format!("post-{author}-{published}")),
            title: "Title".to_string(),
            excerpt: "An excerpt.".to_string(),
            content: "Body".to_string(),
            category_id: CategoryId::new("research"),
            author_id: UserId::new(author),
            author_name: author.to_string(),
            date: Utc::now(),
            read_time: 1,
            published,
        }
    }

    #[test]
    fn anonymous_viewer_is_unauthenticated() {
        let anon = Actor::anonymous();
        assert_eq!(require(&anon, &Permission::READ_PUBLIC), Err(AuthzError::Unauthenticated));
        assert!(!can_manage(&anon));
        assert!(can_view_post(&anon, &post("u1", true)));
        assert!(!can_view_post(&anon, &post("u1", false)));
    }

    #[test]
    fn drafts_visible_to_author_and_admin_only() {
        let draft = post("u1", false);
        let author = Actor::new(UserId::new("u1"), role(Role::READER));
        let other = Actor::new(UserId::new("u2"), role(Role::RESEARCHER));
        let admin = Actor::new(UserId::new("u3"), role(Role::ADMIN));

        assert!(can_view_post(&author, &draft));
        assert!(!can_view_post(&other, &draft));
        assert!(can_view_post(&admin, &draft));
    }

    #[test]
    fn own_post_edit_requires_authorship() {
        let own_editor = Role::new(
            "junior",
            "Junior",
            vec![Permission::READ_ALL, Permission::EDIT_OWN_POST],
            2,
        );
        let junior = Actor::new(UserId::new("u1"), own_editor);

        assert!(can_edit_post(&junior, &post("u1", true)));
        assert!(!can_edit_post(&junior, &post("u2", true)));
        assert_eq!(
            require_post_edit(&junior, &post("u2", true)),
            Err(AuthzError::Forbidden("edit:post".to_string()))
        );

        let researcher = Actor::new(UserId::new("u9"), role(Role::RESEARCHER));
        assert!(can_edit_post(&researcher, &post("u2", true)));
    }

    #[test]
    fn post_list_hides_drafts_from_non_admins() {
        let posts = vec![post("u1", true), post("u1", false), post("u2", false)];
        let reader = Actor::new(UserId::new("u1"), role(Role::READER));
        let admin = Actor::new(UserId::new("u3"), role(Role::ADMIN));

        assert_eq!(visible_posts(&reader, posts.clone()).len(), 1);
        assert_eq!(visible_posts(&admin, posts).len(), 3);
    }

    #[test]
    fn actor_without_role_is_denied() {
        let orphan = Actor {
            id: Some(UserId::new("u1")),
            role: None,
        };
        assert_eq!(
            require(&orphan, &Permission::READ_PUBLIC),
            Err(AuthzError::Unauthenticated)
        );
        assert!(!orphan.can(&Permission::READ_PUBLIC));
    }

    #[test]
    fn role_without_identity_grants_nothing() {
        let ghost = Actor {
            id: None,
            role: Some(role(Role::ADMIN)),
        };
        assert_eq!(require(&ghost, &Permission::ALL), Err(AuthzError::Unauthenticated));
        assert!(!can_manage(&ghost));
    }

    #[test]
    fn require_reports_missing_permission() {
        let reader = Actor::new(UserId::new("u1"), role(Role::READER));
        assert_eq!(
            require(&reader, &Permission::CREATE_OBJECT),
            Err(AuthzError::Forbidden("create:object".to_string()))
        );
        assert_eq!(require(&reader, &Permission::READ_PUBLIC), Ok(()));
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

        #[test]
        fn non_admins_never_see_drafts(published in proptest::collection::vec(any::<bool>(), 0..20)) {
            let posts: Vec<Post> = published
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let mut post = post("u1", *p);
                    post.id = PostId::new(format!("post-{i}"));
                    post
                })
                .collect();
            let reader = Actor::new(UserId::new("u1"), role(Role::READER));

            let visible = visible_posts(&reader, posts);
            prop_assert!(visible.iter().all(|p| p.published));
            prop_assert_eq!(visible.len(), published.iter().filter(|p| **p).count());
        }
    }
}
