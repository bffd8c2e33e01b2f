//! `portal-auth`: authentication and authorization boundary.
//!
//! Roles, users, the session resolver and the route guard live here. The crate
//! is decoupled from any concrete storage: users and roles arrive through
//! injected `Repository` handles and the session record through a
//! `SessionStore`.

pub mod authorize;
pub mod credentials;
pub mod guard;
pub mod permissions;
pub mod roles;
pub mod routes;
pub mod session;
pub mod user;

pub use authorize::{AuthorizationExplanation, AuthzError, Denial, DenialKind, authorize, explain_authorization};
pub use credentials::{CredentialPolicy, PlaintextCredentials};
pub use guard::{ACCESS_DENIED_PATH, GuardDecision, HOME_PATH, LOGIN_PATH, guard, post_login_destination};
pub use permissions::Permission;
pub use roles::Role;
pub use routes::{Access, RouteDef, RouteMatch, resolve_route, route_table};
pub use session::{AuthError, AuthResult, AuthState, InMemorySessionStore, Registration, SessionResolver, SessionStore};
pub use user::{User, normalize_email};
