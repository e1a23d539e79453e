//! Session registries.
//!
//! A registry maps opaque tokens to principals and back. There is one
//! registry per principal class (agents and operators), each owning its own
//! token namespace, so an agent token never validates as an operator token.
//!
//! Each principal holds at most one live token. Logging in again while a
//! session is live returns the same token.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::crypto::generate_token;

/// Token-to-principal mapping for one principal class.
#[async_trait]
pub trait SessionStore<P>: Send + Sync
where
    P: Copy + Send + Sync + 'static,
{
    /// Return the principal's live token, creating one if none exists.
    async fn login(&self, principal: P) -> String;

    /// Resolve a token to its principal.
    async fn validate(&self, token: &str) -> Option<P>;

    /// Remove the principal's session. A no-op if there is none.
    async fn logout(&self, principal: P);

    /// Forcibly drop a principal's session, e.g. when it is deleted.
    async fn evict(&self, principal: P) {
        self.logout(principal).await;
    }

    /// Number of live sessions.
    async fn active_count(&self) -> usize;
}

#[derive(Debug)]
struct Sessions<P> {
    by_token: HashMap<String, P>,
    by_principal: HashMap<P, String>,
}

/// In-memory session registry.
///
/// Both maps sit behind a single lock so they are always mutated together.
#[derive(Debug)]
pub struct MemorySessions<P> {
    inner: RwLock<Sessions<P>>,
}

impl<P> MemorySessions<P> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Sessions {
                by_token: HashMap::new(),
                by_principal: HashMap::new(),
            }),
        }
    }
}

impl<P> Default for MemorySessions<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<P> SessionStore<P> for MemorySessions<P>
where
    P: Copy + Eq + Hash + Debug + Send + Sync + 'static,
{
    async fn login(&self, principal: P) -> String {
        let mut sessions = self.inner.write().await;

        if let Some(token) = sessions.by_principal.get(&principal) {
            return token.clone();
        }

        let token = generate_token();
        sessions.by_token.insert(token.clone(), principal);
        sessions.by_principal.insert(principal, token.clone());
        debug!(principal = ?principal, "Session created");
        token
    }

    async fn validate(&self, token: &str) -> Option<P> {
        self.inner.read().await.by_token.get(token).copied()
    }

    async fn logout(&self, principal: P) {
        let mut sessions = self.inner.write().await;

        if let Some(token) = sessions.by_principal.remove(&principal) {
            sessions.by_token.remove(&token);
            debug!(principal = ?principal, "Session removed");
        }
    }

    async fn active_count(&self) -> usize {
        self.inner.read().await.by_principal.len()
    }
}
