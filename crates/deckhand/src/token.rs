//! Credential lookup for authenticated calls.
//!
//! Where the token lives (keychain, config file, memory) is the caller's
//! concern; resource clients only need to read it at call time.

use std::sync::RwLock;

/// Supplies the locally held bearer credential, if any.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// A process-local token holder.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrips_and_clears() {
        let store = MemoryTokenStore::new();
        assert!(store.token().is_none());

        store.set("tok-1");
        assert_eq!(store.token().as_deref(), Some("tok-1"));

        store.clear();
        assert!(store.token().is_none());
    }

    #[test]
    fn with_token_starts_populated() {
        let store = MemoryTokenStore::with_token("tok-2");
        assert_eq!(store.token().as_deref(), Some("tok-2"));
    }
}
