//! Post workflows.

use chrono::Utc;

use portal_auth::{AuthzError, Permission};
use portal_content::policy::{can_view_post, require, require_post_edit, visible_posts};
use portal_content::{Post, PostDraft};
use portal_core::{CategoryId, DomainError, PostId, Repository};

use crate::{Portal, PortalError, PortalResult};

impl Portal {
    /// Posts the current viewer may list, newest first.
    pub fn list_posts(&self) -> PortalResult<Vec<Post>> {
        let mut posts = visible_posts(self.session(), self.store().posts().list()?);
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    /// A single post. Drafts the viewer may not see read as not found.
    pub fn post_detail(&self, id: &PostId) -> PortalResult<Post> {
        let post = self.find_post(id)?;
        if !can_view_post(self.session(), &post) {
            return Err(PortalError::not_found("post", id));
        }
        Ok(post)
    }

    pub fn create_post(&mut self, draft: &PostDraft) -> PortalResult<Post> {
        require(self.session(), &Permission::CREATE_POST)?;
        let author = self
            .session()
            .current_user()
            .cloned()
            .ok_or(AuthzError::Unauthenticated)?;
        draft.validate()?;
        self.ensure_category(&draft.category_id)?;

        let post = Post::create(PostId::generate(), draft, &author, Utc::now())?;
        let post = self.store().posts().add(post)?;
        tracing::info!(post_id = %post.id, author_id = %author.id, published = post.published, "post created");
        Ok(post)
    }

    pub fn update_post(&mut self, id: &PostId, draft: &PostDraft) -> PortalResult<Post> {
        let mut post = self.find_post(id)?;
        require_post_edit(self.session(), &post)?;
        draft.validate()?;
        self.ensure_category(&draft.category_id)?;

        post.apply_edit(draft)?;
        let post = self.store().posts().update(post)?;
        tracing::info!(post_id = %post.id, "post updated");
        Ok(post)
    }

    pub fn delete_post(&mut self, id: &PostId) -> PortalResult<()> {
        require(self.session(), &Permission::ALL)?;
        if !self.store().posts().delete(id)? {
            return Err(PortalError::not_found("post", id));
        }
        tracing::info!(post_id = %id, "post deleted");
        Ok(())
    }

    fn find_post(&self, id: &PostId) -> PortalResult<Post> {
        self.store()
            .posts()
            .get(id)?
            .ok_or_else(|| PortalError::not_found("post", id))
    }

    fn ensure_category(&self, id: &CategoryId) -> PortalResult<()> {
        if self.store().categories().get(id)?.is_none() {
            return Err(DomainError::validation(format!("unknown category '{id}'")).into());
        }
        Ok(())
    }
}
