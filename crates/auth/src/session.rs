//! Session resolver: materializes the current authentication state from the
//! persisted session record and keeps it consistent across
//! login/logout/registration.
//!
//! The resolver is an explicit value. The application creates one at start-up,
//! hands it by reference to the route guard and to workflows, and drops it at
//! exit. Nothing here is global.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use thiserror::Error;

use portal_core::{DomainError, Repository, RepositoryError, RepositoryResult, RoleId, UserId};

use crate::authorize::{AuthorizationExplanation, explain_authorization};
use crate::credentials::{CredentialPolicy, PlaintextCredentials};
use crate::guard::{GuardDecision, guard};
use crate::routes::resolve_route;
use crate::user::{normalize_email, validate_email, validate_name, validate_password};
use crate::{Permission, Role, User};

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password (deliberately indistinguishable).
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("a user with this email already exists")]
    DuplicateEmail,

    /// The account's role does not exist; the session is refused.
    #[error("role '{0}' does not exist")]
    RoleUnresolved(RoleId),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Session record storage
// ─────────────────────────────────────────────────────────────────────────────

/// Persistence for the single serialized session record.
///
/// The raw string is handed back untouched so the resolver can decide what a
/// malformed record means.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> RepositoryResult<Option<String>>;
    fn save(&self, raw: &str) -> RepositoryResult<()>;
    fn clear(&self) -> RepositoryResult<()>;
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn load(&self) -> RepositoryResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, raw: &str) -> RepositoryResult<()> {
        (**self).save(raw)
    }

    fn clear(&self) -> RepositoryResult<()> {
        (**self).clear()
    }
}

/// In-memory session record for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<Option<String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(Some(raw.into())),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> RepositoryResult<Option<String>> {
        let slot = self
            .inner
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        Ok(slot.clone())
    }

    fn save(&self, raw: &str) -> RepositoryResult<()> {
        let mut slot = self
            .inner
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        *slot = Some(raw.to_string());
        Ok(())
    }

    fn clear(&self) -> RepositoryResult<()> {
        let mut slot = self
            .inner
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth state
// ─────────────────────────────────────────────────────────────────────────────

/// Snapshot of the current authentication state.
///
/// `is_authenticated` implies both `user` and `role` are present: a user
/// whose role does not resolve is never considered authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub role: Option<Role>,
    pub is_loading: bool,
    pub is_authenticated: bool,
}

impl AuthState {
    /// Before `initialize` has run.
    pub fn loading() -> Self {
        Self {
            user: None,
            role: None,
            is_loading: true,
            is_authenticated: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            is_loading: false,
            ..Self::loading()
        }
    }

    fn signed_in(user: User, role: Role) -> Self {
        Self {
            user: Some(user),
            role: Some(role),
            is_loading: false,
            is_authenticated: true,
        }
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user: User,
    pub role: Role,
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolver
// ─────────────────────────────────────────────────────────────────────────────

/// Session resolver over injected user/role repositories and a session store.
pub struct SessionResolver<U, R, S> {
    users: U,
    roles: R,
    session: S,
    credentials: Arc<dyn CredentialPolicy>,
    state: AuthState,
}

impl<U, R, S> SessionResolver<U, R, S>
where
    U: Repository<User>,
    R: Repository<Role>,
    S: SessionStore,
{
    /// Create a resolver in the loading state. Call `initialize` next.
    pub fn new(users: U, roles: R, session: S) -> Self {
        Self {
            users,
            roles,
            session,
            credentials: Arc::new(PlaintextCredentials),
            state: AuthState::loading(),
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialPolicy>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        if self.state.is_authenticated {
            self.state.user.as_ref()
        } else {
            None
        }
    }

    pub fn current_user_id(&self) -> Option<&UserId> {
        self.current_user().map(|u| &u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// Restore state from the persisted session record.
    ///
    /// Never fails: absent, malformed or unresolvable records all end in the
    /// signed-out state (the latter two also clear the record).
    pub fn initialize(&mut self) -> &AuthState {
        let raw = match self.session.load() {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "session record unreadable; starting signed out");
                None
            }
        };

        let Some(raw) = raw else {
            self.state = AuthState::signed_out();
            return &self.state;
        };

        let user = match serde_json::from_str::<User>(&raw) {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed session record");
                self.discard_session();
                return &self.state;
            }
        };

        match self.resolve_role(&user.role_id) {
            Some(role) => {
                tracing::info!(user_id = %user.id, role = %role.id, "session restored");
                self.state = AuthState::signed_in(user, role);
            }
            None => {
                tracing::warn!(
                    user_id = %user.id,
                    role_id = %user.role_id,
                    "session user has no resolvable role; signing out"
                );
                self.discard_session();
            }
        }

        &self.state
    }

    /// Authenticate by email + password.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials` and
    /// leave every stored record untouched. So does a session write failure.
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<User> {
        let email = normalize_email(email);
        let user = self.find_by_email(&email)?;

        let Some(mut user) = user.filter(|u| self.credentials.verify(&u.password, password)) else {
            tracing::warn!("login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let role = self
            .resolve_role(&user.role_id)
            .ok_or_else(|| AuthError::RoleUnresolved(user.role_id.clone()))?;

        user.last_login = Some(Utc::now());
        self.persist_session(&user)?;

        // The session is authoritative; the stamp on the stored account is
        // best-effort.
        if let Err(err) = self.users.update(user.clone()) {
            tracing::warn!(error = %err, user_id = %user.id, "failed to record last login");
        }

        tracing::info!(user_id = %user.id, role = %role.id, "login succeeded");
        self.state = AuthState::signed_in(user.clone(), role);
        Ok(user)
    }

    /// Create an account and sign it in.
    ///
    /// The first account in an empty users collection becomes `admin`; every
    /// later one becomes `reader`.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> AuthResult<Registration> {
        validate_name(name)?;
        validate_email(email)?;
        validate_password(password)?;

        let email = normalize_email(email);
        if self.find_by_email(&email)?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let role_id = if self.users.list()?.is_empty() {
            RoleId::new(Role::ADMIN)
        } else {
            RoleId::new(Role::READER)
        };
        let role = self
            .resolve_role(&role_id)
            .ok_or_else(|| AuthError::RoleUnresolved(role_id.clone()))?;

        let user = self.users.add(User {
            id: UserId::generate(),
            name: name.trim().to_string(),
            email,
            password: self.credentials.seal(password),
            role_id,
            created_at: Utc::now(),
            last_login: None,
        })?;
        self.persist_session(&user)?;

        let message = if role.id.as_str() == Role::ADMIN {
            "Registered as administrator with full access to the system".to_string()
        } else {
            "Registered successfully as a reader".to_string()
        };

        tracing::info!(user_id = %user.id, role = %role.id, "user registered");
        self.state = AuthState::signed_in(user.clone(), role.clone());
        Ok(Registration { user, role, message })
    }

    /// Clear the session. Idempotent.
    pub fn logout(&mut self) {
        if let Some(user) = self.current_user() {
            tracing::info!(user_id = %user.id, "logout");
        }
        self.discard_session();
    }

    /// Exact-match permission check with the `"all"` short-circuit.
    ///
    /// The role is re-resolved on every call so out-of-band role removal takes
    /// effect immediately (fail closed).
    pub fn check_permission(&self, permission: &Permission) -> bool {
        self.current_role()
            .map(|role| role.grants(permission))
            .unwrap_or(false)
    }

    /// The session user's role as currently stored, if it resolves.
    pub fn current_role(&self) -> Option<Role> {
        let user = self.current_user()?;
        self.resolve_role(&user.role_id)
    }

    /// Replace the session copy after the current user's record changed.
    pub fn refresh_user(&mut self, user: User) -> AuthResult<()> {
        match self.current_user_id() {
            Some(id) if *id == user.id => {}
            _ => return Err(AuthError::NotAuthenticated),
        }

        match self.resolve_role(&user.role_id) {
            Some(role) => {
                self.persist_session(&user)?;
                self.state = AuthState::signed_in(user, role);
                Ok(())
            }
            None => {
                let role_id = user.role_id.clone();
                self.discard_session();
                Err(AuthError::RoleUnresolved(role_id))
            }
        }
    }

    /// Route guard evaluated against the current state.
    pub fn guard(&self, location: &str, required: Option<&Permission>) -> GuardDecision {
        guard(
            self.state.is_loading,
            self.state.is_authenticated,
            required,
            |p| self.check_permission(p),
            location,
        )
    }

    /// Resolve `location` against the route table and guard it.
    ///
    /// Public routes render regardless of session state.
    pub fn authorize_navigation(&self, location: &str) -> GuardDecision {
        let matched = resolve_route(location);
        if matched.route.access.is_public() {
            return GuardDecision::Render;
        }
        self.guard(location, matched.route.access.required_permission())
    }

    /// Explain how `check_permission(required)` would be decided.
    pub fn explain(&self, required: &Permission) -> AuthorizationExplanation {
        let catalog = self.roles.list().unwrap_or_default();
        explain_authorization(self.current_role().as_ref(), required, &catalog)
    }

    /// Policy used to seal and verify passwords.
    pub fn credentials(&self) -> &dyn CredentialPolicy {
        self.credentials.as_ref()
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    pub fn roles(&self) -> &R {
        &self.roles
    }

    /// Role lookup; storage failures count as "unresolved".
    fn resolve_role(&self, role_id: &RoleId) -> Option<Role> {
        match self.roles.get(role_id) {
            Ok(role) => role,
            Err(err) => {
                tracing::warn!(error = %err, role_id = %role_id, "role lookup failed");
                None
            }
        }
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self.users.find(&|u: &User| normalize_email(&u.email) == email)?)
    }

    fn persist_session(&self, user: &User) -> AuthResult<()> {
        let raw = serde_json::to_string(user)
            .map_err(|e| RepositoryError::Storage(format!("session serialization failed: {e}")))?;
        self.session.save(&raw)?;
        Ok(())
    }

    fn discard_session(&mut self) {
        if let Err(err) = self.session.clear() {
            tracing::warn!(error = %err, "failed to clear session record");
        }
        self.state = AuthState::signed_out();
    }
}
