//! Storage key naming.

pub const DEFAULT_PREFIX: &str = "sce-";

const SESSION_KEY: &str = "current-user";

/// Key layout for one storage profile: `<prefix><collection>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    prefix: String,
}

impl Keys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn collection(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn session(&self) -> String {
        self.collection(SESSION_KEY)
    }
}

impl Default for Keys {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}
