//! Strongly-typed record identifiers.
//!
//! Identifiers are persisted as plain strings (`"admin"`, `"user-<uuid>"`,
//! `"sce-007"`), so each newtype is a transparent wrapper over `String`.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a role (`admin`, `researcher`, `reader`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

/// Identifier of a content object (`sce-001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

/// Identifier of a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

/// Identifier of a post category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

/// Identifier of a department.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentId(String);

/// Identifier of a position within a department.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(String);

macro_rules! impl_string_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_string_id!(UserId, "UserId");
impl_string_id!(RoleId, "RoleId");
impl_string_id!(ObjectId, "ObjectId");
impl_string_id!(PostId, "PostId");
impl_string_id!(CategoryId, "CategoryId");
impl_string_id!(DepartmentId, "DepartmentId");
impl_string_id!(PositionId, "PositionId");

impl UserId {
    /// Generate a fresh user id (`user-<uuidv7>`).
    ///
    /// UUIDv7 keeps ids time-ordered. Prefer passing ids explicitly in tests.
    pub fn generate() -> Self {
        Self(format!("user-{}", Uuid::now_v7()))
    }
}

impl PostId {
    /// Generate a fresh post id (`post-<uuidv7>`).
    pub fn generate() -> Self {
        Self(format!("post-{}", Uuid::now_v7()))
    }
}

impl ObjectId {
    const PREFIX: &'static str = "sce-";

    /// Build the id for the `number`-th catalogued object (`sce-007`).
    pub fn from_number(number: u32) -> Self {
        Self(format!("{}{:03}", Self::PREFIX, number))
    }

    /// Catalogue number encoded in the id, if it follows the `sce-NNN` shape.
    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix(Self::PREFIX)?.parse().ok()
    }
}
