use portal_auth::{
    AuthorizationExplanation, GuardDecision, Permission, Registration, User, post_login_destination,
};
use portal_store::{PortalResolver, PortalStore, SeedReport};

use crate::PortalResult;

/// One storage profile plus the session resolved from it.
pub struct Portal {
    store: PortalStore,
    session: PortalResolver,
}

impl Portal {
    /// Seed the store if needed and restore the persisted session.
    pub fn open(store: PortalStore) -> PortalResult<(Self, SeedReport)> {
        let report = store.initialize()?;
        let session = store.session_resolver();
        Ok((Self { store, session }, report))
    }

    pub fn store(&self) -> &PortalStore {
        &self.store
    }

    pub fn session(&self) -> &PortalResolver {
        &self.session
    }

    /// Re-read the session record, as a page reload would.
    pub fn reload(&mut self) {
        self.session.initialize();
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> PortalResult<Registration> {
        Ok(self.session.register(name, email, password)?)
    }

    pub fn login(&mut self, email: &str, password: &str) -> PortalResult<User> {
        Ok(self.session.login(email, password)?)
    }

    /// Sign in after a guard redirect and return the location to continue to.
    ///
    /// `return_to` comes from `GuardDecision::RedirectToLogin`; anything that
    /// is not an in-app path falls back to home.
    pub fn login_and_return(
        &mut self,
        email: &str,
        password: &str,
        return_to: Option<&str>,
    ) -> PortalResult<String> {
        self.login(email, password)?;
        Ok(post_login_destination(return_to).to_string())
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Guard decision for navigating to `location`.
    ///
    /// The view layer follows `GuardDecision::redirect_target` for the
    /// redirecting outcomes.
    pub fn navigate(&self, location: &str) -> GuardDecision {
        self.session.authorize_navigation(location)
    }

    pub fn explain(&self, permission: &Permission) -> AuthorizationExplanation {
        self.session.explain(permission)
    }

    pub(crate) fn session_mut(&mut self) -> &mut PortalResolver {
        &mut self.session
    }
}
