//! Per-session chat history and signed session tokens.
//!
//! Sessions live in process memory only. A client carries its session id in a
//! token of the form `{uuid}.{hex hmac-sha256(secret, uuid)}`; tokens that fail
//! verification are treated as absent. A session takes up memory only once its
//! first exchange is recorded.

use crate::shared::{ChatTurn, HISTORY_WINDOW};
use dashmap::DashMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session secret rejected by HMAC key setup")]
    InvalidSecret,
}

/// In-memory map from session id to its full chat history.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Vec<ChatTurn>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one exchange (user turn, then assistant turn) and returns the
    /// last [`HISTORY_WINDOW`] turns. The session entry is created here on first use.
    pub fn record_exchange(&self, id: Uuid, user: ChatTurn, assistant: ChatTurn) -> Vec<ChatTurn> {
        let mut history = self.sessions.entry(id).or_insert_with(|| {
            tracing::debug!(session = %id, "session created");
            Vec::new()
        });
        history.push(user);
        history.push(assistant);
        recent(&history)
    }

    /// Clears the session's history; the id stays valid. Unknown ids are left alone.
    pub fn reset(&self, id: Uuid) {
        let Some(mut history) = self.sessions.get_mut(&id) else {
            return;
        };
        let cleared = history.len();
        history.clear();
        tracing::debug!(session = %id, cleared, "session history reset");
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    fn contains(&self, id: &Uuid) -> bool {
        self.sessions.contains_key(id)
    }

    #[cfg(test)]
    fn recent_history(&self, id: &Uuid) -> Vec<ChatTurn> {
        self.sessions
            .get(id)
            .map(|h| recent(&h))
            .unwrap_or_default()
    }

    #[cfg(test)]
    fn history_len(&self, id: &Uuid) -> usize {
        self.sessions.get(id).map(|h| h.len()).unwrap_or(0)
    }
}

fn recent(history: &[ChatTurn]) -> Vec<ChatTurn> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..].to_vec()
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, SessionError> {
        let mac = HmacSha256::new_from_slice(secret.as_ref()).map_err(|_| SessionError::InvalidSecret)?;
        Ok(Self { mac })
    }

    /// Token for `id`: `{uuid}.{signature}`.
    pub fn sign(&self, id: Uuid) -> String {
        let tag = self.keyed(&id).finalize().into_bytes();
        format!("{}.{}", id, hex::encode(tag))
    }

    /// Returns the session id if `token` was produced by [`Self::sign`] with this secret.
    /// The signature is checked in constant time.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let (id, signature) = token.split_once('.')?;
        let id = Uuid::parse_str(id).ok()?;
        let signature = hex::decode(signature).ok()?;
        self.keyed(&id).verify_slice(&signature).ok()?;
        Some(id)
    }

    fn keyed(&self, id: &Uuid) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(id.as_hyphenated().to_string().as_bytes());
        mac
    }
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}
