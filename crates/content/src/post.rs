//! Posts (articles, briefings, incident reports).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_auth::User;
use portal_core::{CategoryId, DomainError, DomainResult, Entity, PostId, Record, UserId};

const MIN_EXCERPT_LEN: usize = 10;
const MIN_CONTENT_LEN: usize = 50;

/// A post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category_id: CategoryId,
    pub author_id: UserId,
    /// Author display name captured at creation time.
    pub author_name: String,
    pub date: DateTime<Utc>,
    /// Estimated reading time in minutes.
    pub read_time: u32,
    pub published: bool,
}

/// Editable fields of a post, as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category_id: CategoryId,
    pub read_time: u32,
    pub published: bool,
}

impl PostDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        if self.excerpt.trim().chars().count() < MIN_EXCERPT_LEN {
            return Err(DomainError::validation(format!(
                "excerpt must be at least {MIN_EXCERPT_LEN} characters"
            )));
        }
        if self.content.trim().chars().count() < MIN_CONTENT_LEN {
            return Err(DomainError::validation(format!(
                "content must be at least {MIN_CONTENT_LEN} characters"
            )));
        }
        if self.category_id.as_str().trim().is_empty() {
            return Err(DomainError::validation("category is required"));
        }
        if self.read_time < 1 {
            return Err(DomainError::validation("read time must be at least 1 minute"));
        }
        Ok(())
    }
}

impl Post {
    pub fn create(id: PostId, draft: &PostDraft, author: &User, now: DateTime<Utc>) -> DomainResult<Self> {
        draft.validate()?;
        Ok(Self {
            id,
            title: draft.title.trim().to_string(),
            excerpt: draft.excerpt.clone(),
            content: draft.content.clone(),
            category_id: draft.category_id.clone(),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            date: now,
            read_time: draft.read_time,
            published: draft.published,
        })
    }

    /// Apply an edit; authorship and the original date are preserved.
    pub fn apply_edit(&mut self, draft: &PostDraft) -> DomainResult<()> {
        draft.validate()?;
        self.title = draft.title.trim().to_string();
        self.excerpt = draft.excerpt.clone();
        self.content = draft.content.clone();
        self.category_id = draft.category_id.clone();
        self.read_time = draft.read_time;
        self.published = draft.published;
        Ok(())
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        self.author_id == *user_id
    }
}

impl Entity for Post {
    type Id = PostId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Post {
    const COLLECTION: &'static str = "posts";
}
