//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::{DomainError, Entity, Record, RoleId, UserId};

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered user.
///
/// # Invariants
/// - `email` is unique across the users collection (stored normalized).
/// - `role_id` must resolve to an existing role; a dangling reference makes
///   every permission check fail closed.
///
/// `password` holds whatever the active `CredentialPolicy` sealed. With the
/// prototype `PlaintextCredentials` that is the raw secret, which is also
/// copied into the session record. Never deploy that combination.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl core::fmt::Debug for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role_id", &self.role_id)
            .field("created_at", &self.created_at)
            .field("last_login", &self.last_login)
            .finish()
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for User {
    const COLLECTION: &'static str = "users";
}

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic `local@domain.tld` shape check.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(DomainError::validation("invalid email format"))
    }
}

pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
