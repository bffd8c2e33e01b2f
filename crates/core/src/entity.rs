//! Entity trait: identity + continuity across state changes.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity persisted as one element of a named collection.
///
/// Collections are stored wholesale as a JSON array under a single key, so a
/// record only needs to be serializable and know which collection it lives in.
pub trait Record: Entity + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name (`users`, `roles`, `posts`, ...).
    const COLLECTION: &'static str;
}
