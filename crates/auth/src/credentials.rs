//! Credential sealing/verification seam.
//!
//! The portal stores whatever `CredentialPolicy::seal` returns in
//! `User::password` and later asks `verify` to compare a presented secret
//! against it.
//!
//! **Prototype only:** the shipped `PlaintextCredentials` keeps the raw
//! secret and compares strings directly. A real deployment must plug in a
//! policy that stores a salted one-way digest and compares digests.

/// How secrets are stored and compared.
pub trait CredentialPolicy: Send + Sync {
    /// Turn a freshly chosen secret into its stored form.
    fn seal(&self, secret: &str) -> String;

    /// Does `presented` match the `stored` form?
    fn verify(&self, stored: &str, presented: &str) -> bool;
}

/// Stores and compares secrets verbatim (exact match, no normalization).
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextCredentials;

impl CredentialPolicy for PlaintextCredentials {
    fn seal(&self, secret: &str) -> String {
        secret.to_string()
    }

    fn verify(&self, stored: &str, presented: &str) -> bool {
        stored == presented
    }
}
