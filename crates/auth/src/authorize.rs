use serde::Serialize;
use thiserror::Error;

use crate::{Permission, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a resolved role against a required permission.
///
/// - No IO
/// - No panics
/// - `None` (unauthenticated or dangling role reference) is always denied
pub fn authorize(role: Option<&Role>, required: &Permission) -> Result<(), AuthzError> {
    let role = role.ok_or(AuthzError::Unauthenticated)?;
    if role.grants(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// Answers "why was this allowed/denied?" for admin screens and logs.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_permission: String,
    pub granted: bool,
    pub reason: String,
    pub role: Option<String>,
    pub effective_permissions: Vec<String>,
    pub has_all: bool,
    pub denial: Option<Denial>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Denial {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    MissingPermission,
}

/// Explain the decision `authorize(role, required)` would make.
///
/// `catalog` is the known role list; on denial it is used to suggest roles
/// that would grant the permission.
pub fn explain_authorization(
    role: Option<&Role>,
    required: &Permission,
    catalog: &[Role],
) -> AuthorizationExplanation {
    let required_str = required.as_str().to_string();

    let Some(role) = role else {
        return AuthorizationExplanation {
            required_permission: required_str,
            granted: false,
            reason: "No authenticated user with a resolvable role".to_string(),
            role: None,
            effective_permissions: Vec::new(),
            has_all: false,
            denial: Some(Denial {
                kind: DenialKind::Unauthenticated,
                message: "Sign in with an account whose role exists".to_string(),
                suggestions: vec!["Log in again".to_string()],
            }),
        };
    };

    let mut effective: Vec<String> = role.permissions.iter().map(|p| p.to_string()).collect();
    effective.sort();
    effective.dedup();

    let has_all = role.has_all();
    if role.grants(required) {
        let reason = if has_all {
            format!("Role '{}' holds the 'all' permission", role.id)
        } else {
            format!("Role '{}' holds permission '{}'", role.id, required_str)
        };
        return AuthorizationExplanation {
            required_permission: required_str,
            granted: true,
            reason,
            role: Some(role.id.to_string()),
            effective_permissions: effective,
            has_all,
            denial: None,
        };
    }

    let granting: Vec<String> = catalog
        .iter()
        .filter(|r| r.grants(required))
        .map(|r| r.id.to_string())
        .collect();

    let mut suggestions = vec![format!(
        "Assign a role that grants the '{}' permission",
        required_str
    )];
    if !granting.is_empty() {
        suggestions.insert(0, format!("Roles that grant it: {}", granting.join(", ")));
    }

    AuthorizationExplanation {
        reason: format!(
            "Role '{}' does not hold permission '{}'. Current permissions: {:?}",
            role.id, required_str, effective
        ),
        required_permission: required_str.clone(),
        granted: false,
        role: Some(role.id.to_string()),
        effective_permissions: effective,
        has_all: false,
        denial: Some(Denial {
            kind: DenialKind::MissingPermission,
            message: format!("Missing required permission: '{}'", required_str),
            suggestions,
        }),
    }
}
