//! User administration and profile editing.

use serde::Deserialize;

use portal_auth::user::{validate_name, validate_password};
use portal_auth::{AuthzError, Permission, Role, User};
use portal_content::policy::require;
use portal_core::{DomainError, Repository, RoleId, UserId};

use crate::{Portal, PortalError, PortalResult};

/// Profile form submitted by the signed-in user.
///
/// Leaving `new_password` empty keeps the current password.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub current_password: String,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

impl Portal {
    pub fn list_users(&self) -> PortalResult<Vec<User>> {
        require(self.session(), &Permission::ALL)?;
        Ok(self.store().users().list()?)
    }

    /// Roles available for assignment.
    pub fn list_roles(&self) -> PortalResult<Vec<Role>> {
        require(self.session(), &Permission::ALL)?;
        Ok(self.store().roles().list()?)
    }

    pub fn change_user_role(&mut self, user_id: &UserId, role_id: &RoleId) -> PortalResult<User> {
        require(self.session(), &Permission::ALL)?;
        if self.store().roles().get(role_id)?.is_none() {
            return Err(PortalError::not_found("role", role_id));
        }

        let mut user = self
            .store()
            .users()
            .get(user_id)?
            .ok_or_else(|| PortalError::not_found("user", user_id))?;
        let previous = std::mem::replace(&mut user.role_id, role_id.clone());
        let user = self.store().users().update(user)?;
        tracing::info!(user_id = %user.id, from = %previous, to = %user.role_id, "user role changed");

        if self.session().current_user_id() == Some(&user.id) {
            self.session_mut().refresh_user(user.clone())?;
        }
        Ok(user)
    }

    pub fn delete_user(&mut self, user_id: &UserId) -> PortalResult<()> {
        require(self.session(), &Permission::ALL)?;
        if self.session().current_user_id() == Some(user_id) {
            return Err(PortalError::SelfDeletion);
        }
        if !self.store().users().delete(user_id)? {
            return Err(PortalError::not_found("user", user_id));
        }
        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    /// Update the signed-in user's name and, optionally, password.
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> PortalResult<User> {
        let user_id = self
            .session()
            .current_user_id()
            .cloned()
            .ok_or(AuthzError::Unauthenticated)?;
        let mut user = self
            .store()
            .users()
            .get(&user_id)?
            .ok_or_else(|| PortalError::not_found("user", &user_id))?;

        let credentials = self.session().credentials();
        if !credentials.verify(&user.password, &update.current_password) {
            return Err(DomainError::validation("current password is incorrect").into());
        }
        validate_name(&update.name)?;

        let new_password = update.new_password.as_deref().filter(|p| !p.is_empty());
        if let Some(new_password) = new_password {
            validate_password(new_password)?;
            if update.confirm_password.as_deref() != Some(new_password) {
                return Err(DomainError::validation("new passwords do not match").into());
            }
            user.password = credentials.seal(new_password);
        }
        user.name = update.name.trim().to_string();

        let user = self.store().users().update(user)?;
        self.session_mut().refresh_user(user.clone())?;
        tracing::info!(user_id = %user.id, password_changed = new_password.is_some(), "profile updated");
        Ok(user)
    }
}
