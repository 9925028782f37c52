//! Session token state

use std::fmt;

use parking_lot::RwLock;

/// The single session token a client sends as `X-Session-ID`
///
/// Locks are held only for the copy in or out, so concurrent requests see
/// whichever value was written last.
#[derive(Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    /// Current token, if any
    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Store a token; an empty token leaves no session
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        *self.token.write() = (!token.is_empty()).then_some(token);
    }

    /// Drop the token, returning what was stored
    pub fn clear(&self) -> Option<String> {
        self.token.write().take()
    }

    pub fn is_active(&self) -> bool {
        self.token.read().is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_active() { "active" } else { "none" };
        f.debug_struct("Session").field("token", &state).finish()
    }
}
