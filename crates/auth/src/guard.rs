//! Route guard.
//!
//! A stateless decision re-evaluated on every render. It has no transitions
//! of its own; it only reflects the session resolver's current state.

use crate::Permission;

pub const LOGIN_PATH: &str = "/login";
pub const ACCESS_DENIED_PATH: &str = "/access-denied";
pub const HOME_PATH: &str = "/";

/// What the view layer should do with a requested location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state is still loading: show a placeholder, do not redirect.
    Loading,
    /// Not signed in: go to the login entry point, then come back.
    RedirectToLogin { return_to: String },
    /// Signed in but lacking the required permission.
    AccessDenied,
    /// Render the requested content.
    Render,
}

impl GuardDecision {
    /// Location to navigate to, if the decision is a redirect.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardDecision::RedirectToLogin { .. } => Some(LOGIN_PATH),
            GuardDecision::AccessDenied => Some(ACCESS_DENIED_PATH),
            GuardDecision::Loading | GuardDecision::Render => None,
        }
    }
}

/// Evaluate the guard. First match wins:
///
/// 1. loading → `Loading`
/// 2. unauthenticated → `RedirectToLogin` remembering `location`
/// 3. permission required and denied → `AccessDenied`
/// 4. otherwise → `Render`
pub fn guard<F>(
    is_loading: bool,
    is_authenticated: bool,
    required: Option<&Permission>,
    check_permission: F,
    location: &str,
) -> GuardDecision
where
    F: Fn(&Permission) -> bool,
{
    if is_loading {
        return GuardDecision::Loading;
    }
    if !is_authenticated {
        return GuardDecision::RedirectToLogin {
            return_to: location.to_string(),
        };
    }
    if let Some(required) = required {
        if !check_permission(required) {
            return GuardDecision::AccessDenied;
        }
    }
    GuardDecision::Render
}

/// Where to go after a successful login.
///
/// Only in-app absolute paths are honoured; anything else (including the login
/// page itself) falls back to home.
pub fn post_login_destination(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && path != LOGIN_PATH => path,
        _ => HOME_PATH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_all(_: &Permission) -> bool {
        true
    }

    fn deny_all(_: &Permission) -> bool {
        false
    }

    #[test]
    fn loading_wins_over_everything() {
        assert_eq!(
            guard(true, false, Some(&Permission::ALL), deny_all, "/admin"),
            GuardDecision::Loading
        );
        assert_eq!(guard(true, true, None, allow_all, "/profile"), GuardDecision::Loading);
    }

    #[test]
    fn unauthenticated_redirects_with_return_path() {
        let decision = guard(false, false, None, allow_all, "/posts/create");
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                return_to: "/posts/create".to_string()
            }
        );
        assert_eq!(decision.redirect_target(), Some(LOGIN_PATH));
    }

    #[test]
    fn missing_permission_is_access_denied() {
        let decision = guard(false, true, Some(&Permission::ALL), deny_all, "/admin");
        assert_eq!(decision, GuardDecision::AccessDenied);
        assert_eq!(decision.redirect_target(), Some(ACCESS_DENIED_PATH));
    }

    #[test]
    fn permission_is_not_consulted_when_absent() {
        let decision = guard(false, true, None, |_| panic!("must not be called"), "/profile");
        assert_eq!(decision, GuardDecision::Render);
    }

    #[test]
    fn granted_permission_renders() {
        let check = |p: &Permission| *p == Permission::CREATE_POST;
        assert_eq!(
            guard(false, true, Some(&Permission::CREATE_POST), check, "/posts/create"),
            GuardDecision::Render
        );
        assert_eq!(
            guard(false, true, Some(&Permission::EDIT_POST), check, "/posts/edit/1"),
            GuardDecision::AccessDenied
        );
    }

    #[test]
    fn post_login_destination_falls_back_to_home() {
        assert_eq!(post_login_destination(Some("/posts/create")), "/posts/create");
        assert_eq!(post_login_destination(None), "/");
        assert_eq!(post_login_destination(Some("https://evil.example")), "/");
        assert_eq!(post_login_destination(Some("//evil.example")), "/");
        assert_eq!(post_login_destination(Some("/login")), "/");
    }
}
