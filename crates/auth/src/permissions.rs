use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are exact-match string literals (e.g. `"create:post"`). The
/// only wildcard is the sentinel `"all"`, which satisfies every check. There
/// is no prefix matching: `"edit:post"` and `"edit:own:post"` are unrelated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Universal sentinel.
    pub const ALL: Self = Self(Cow::Borrowed("all"));
    pub const READ_ALL: Self = Self(Cow::Borrowed("read:all"));
    pub const READ_PUBLIC: Self = Self(Cow::Borrowed("read:public"));
    pub const CREATE_POST: Self = Self(Cow::Borrowed("create:post"));
    pub const EDIT_POST: Self = Self(Cow::Borrowed("edit:post"));
    pub const EDIT_OWN_POST: Self = Self(Cow::Borrowed("edit:own:post"));
    pub const CREATE_OBJECT: Self = Self(Cow::Borrowed("create:object"));
    pub const EDIT_OBJECT: Self = Self(Cow::Borrowed("edit:object"));

    /// The full vocabulary, sentinel first.
    pub const VOCABULARY: [Self; 8] = [
        Self::ALL,
        Self::READ_ALL,
        Self::READ_PUBLIC,
        Self::CREATE_POST,
        Self::EDIT_POST,
        Self::EDIT_OWN_POST,
        Self::CREATE_OBJECT,
        Self::EDIT_OBJECT,
    ];

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_all(&self) -> bool {
        self.as_str() == "all"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_sentinel_is_all() {
        assert!(Permission::ALL.is_all());
        assert!(Permission::new(String::from("all")).is_all());
        assert!(!Permission::READ_ALL.is_all());
        assert!(!Permission::new("ALL").is_all());
    }

    #[test]
    fn owned_and_borrowed_compare_equal() {
        let owned = Permission::new(String::from("edit:own:post"));
        assert_eq!(owned, Permission::EDIT_OWN_POST);
        assert_ne!(owned, Permission::EDIT_POST);
    }

    #[test]
    fn serializes_as_bare_string() {
        let json = serde_json::to_string(&vec![Permission::ALL, Permission::CREATE_POST]).unwrap();
        assert_eq!(json, r#"["all","create:post"]"#);
        let back: Vec<Permission> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Permission::ALL, Permission::CREATE_POST]);
    }
}
