//! `portal-store`: key/value storage backends and the repositories built on
//! top of them.
//!
//! Every collection lives under one key as a JSON array; the session record
//! lives under its own key. `PortalStore` wires the repositories for one
//! storage profile and seeds reference data.

pub mod keys;
pub mod portal;
pub mod repository;
pub mod session;
pub mod storage;

pub use keys::{DEFAULT_PREFIX, Keys};
pub use portal::{PortalResolver, PortalStore, SeedReport};
pub use repository::StorageRepository;
pub use session::StorageSessionStore;
pub use storage::{FileStorage, InMemoryStorage, Storage, StorageError, StorageResult};
