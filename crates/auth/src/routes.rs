//! Route table: which locations are public, which need a session, and which
//! need a specific permission.

use crate::Permission;

/// Access requirement for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Permission(Permission),
}

impl Access {
    /// Permission to hand to the guard, if any.
    pub fn required_permission(&self) -> Option<&Permission> {
        match self {
            Access::Permission(p) => Some(p),
            Access::Public | Access::Authenticated => None,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Access::Public)
    }
}

/// A route pattern. Segments starting with `:` capture a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub name: &'static str,
    pub pattern: &'static str,
    pub access: Access,
}

/// A resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: RouteDef,
    pub params: Vec<(&'static str, String)>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

pub const NOT_FOUND: &str = "not_found";

/// The portal's route surface.
pub fn route_table() -> Vec<RouteDef> {
    let route = |name: &'static str, pattern: &'static str, access: Access| RouteDef {
        name,
        pattern,
        access,
    };
    vec![
        route("home", "/", Access::Public),
        route("login", "/login", Access::Public),
        route("register", "/register", Access::Public),
        route("about", "/about", Access::Public),
        route("privacy", "/privacy", Access::Public),
        route("access_denied", "/access-denied", Access::Public),
        route("profile", "/profile", Access::Authenticated),
        route("objects", "/objects", Access::Public),
        route("object_create", "/objects/create", Access::Permission(Permission::CREATE_OBJECT)),
        route("object_edit", "/objects/edit/:id", Access::Permission(Permission::EDIT_OBJECT)),
        route("object_detail", "/objects/:id", Access::Public),
        route("posts", "/posts", Access::Public),
        route("post_create", "/posts/create", Access::Permission(Permission::CREATE_POST)),
        // Ownership is checked by the edit workflow itself.
        route("post_edit", "/posts/edit/:id", Access::Authenticated),
        route("post_detail", "/posts/:id", Access::Public),
        route("admin", "/admin", Access::Permission(Permission::ALL)),
        route("admin_users", "/admin/users", Access::Permission(Permission::ALL)),
    ]
}

/// Resolve a location (query string and fragment ignored) to a route.
///
/// Static segments take precedence over `:param` segments, so
/// `/objects/create` never matches `/objects/:id`. Unknown locations resolve
/// to a public not-found route.
pub fn resolve_route(location: &str) -> RouteMatch {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut best: Option<(usize, RouteMatch)> = None;
    for route in route_table() {
        let Some(params) = match_pattern(route.pattern, &segments) else {
            continue;
        };
        let static_segments = segments.len() - params.len();
        if best.as_ref().is_none_or(|(score, _)| static_segments > *score) {
            best = Some((static_segments, RouteMatch { route, params }));
        }
    }

    best.map(|(_, m)| m).unwrap_or_else(|| RouteMatch {
        route: RouteDef {
            name: NOT_FOUND,
            pattern: "*",
            access: Access::Public,
        },
        params: Vec::new(),
    })
}

fn match_pattern(pattern: &'static str, segments: &[&str]) -> Option<Vec<(&'static str, String)>> {
    let parts: Vec<&'static str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (part, segment) in parts.into_iter().zip(segments) {
        match part.strip_prefix(':') {
            Some(name) => params.push((name, (*segment).to_string())),
            None if part == *segment => {}
            None => return None,
        }
    }
    Some(params)
}
