//! `portal-content`: content records, reference taxonomies and the content
//! access policy.
//!
//! Pure domain: validation and permission decisions only. Persistence is done
//! by whoever holds the repositories.

pub mod object;
pub mod policy;
pub mod post;
pub mod taxonomy;

pub use object::{ContentObject, ObjectClass, ObjectDraft, next_object_id};
pub use policy::{Actor, Viewer};
pub use post::{Post, PostDraft};
pub use taxonomy::{Category, Department, Position};
