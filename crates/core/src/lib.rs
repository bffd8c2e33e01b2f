//! `portal-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the auth, content
//! and store crates (no storage backend, no session state).

pub mod entity;
pub mod error;
pub mod id;
pub mod repository;

pub use entity::{Entity, Record};
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, DepartmentId, ObjectId, PositionId, PostId, RoleId, UserId};
pub use repository::{InMemoryRepository, Repository, RepositoryError, RepositoryResult};
