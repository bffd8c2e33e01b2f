//! `portal-app`: the portal facade.
//!
//! `Portal` owns one storage profile and the session resolver over it, and
//! exposes the user, profile, post and object workflows. Every workflow
//! checks the current session before touching storage.

pub mod config;
pub mod error;
pub mod objects;
pub mod portal;
pub mod posts;
pub mod users;

pub use config::PortalConfig;
pub use error::{PortalError, PortalResult};
pub use portal::Portal;
pub use users::ProfileUpdate;
