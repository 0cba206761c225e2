use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::RngCore;
use serde::Serialize;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub created: DateTime<Utc>,
}

/// Process-local registry of issued tokens. No expiry; lost on restart.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    tokens: Arc<DashMap<String, SessionInfo>>,
}

impl SessionRegistry {
    pub fn new() -> Self { Self::default() }

    /// Mint a random hex token and remember when it was created.
    pub fn issue(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.tokens.insert(token.clone(), SessionInfo { created: Utc::now() });
        token
    }

    pub fn verify(&self, token: &str) -> bool { self.tokens.contains_key(token) }

    pub fn get(&self, token: &str) -> Option<SessionInfo> { self.tokens.get(token).map(|e| e.value().clone()) }

    pub fn len(&self) -> usize { self.tokens.len() }

    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_and_are_distinct() {
        let reg = SessionRegistry::new();
        assert!(!reg.verify("anything"));
        let a = reg.issue();
        let b = reg.issue();
        assert_ne!(a, b);
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(reg.verify(&a) && reg.verify(&b));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn clones_share_the_same_tokens() {
        let reg = SessionRegistry::new();
        let other = reg.clone();
        let t = reg.issue();
        assert!(other.verify(&t));
        assert!(other.get(&t).unwrap().created <= Utc::now());
    }

    #[test]
    fn empty_token_never_verifies() {
        let reg = SessionRegistry::new();
        reg.issue();
        assert!(!reg.verify(""));
    }
}
