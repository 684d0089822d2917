// Session context shared by every screen. The persisted entries are the
// source of truth; `SessionState` is what they mean.

use crate::error::StoreError;
use crate::store::{Key, SessionStore};
use tracing::info;

/// Where the user is in the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    /// A one-time code was issued for `phone` and awaits confirmation.
    PendingVerification { phone: String, code: String },
    Authenticated { token: String },
}

impl SessionState {
    /// Derive the state from stored entries. A token wins over a pending
    /// verification.
    pub fn from_store<S: SessionStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        if let Some(token) = store.get(Key::Token)? {
            return Ok(SessionState::Authenticated { token });
        }
        match (store.get(Key::Phone)?, store.get(Key::Code)?) {
            (Some(phone), Some(code)) if !phone.is_empty() && !code.is_empty() => {
                Ok(SessionState::PendingVerification { phone, code })
            }
            _ => Ok(SessionState::Anonymous),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::PendingVerification { .. } => "pending verification",
            SessionState::Authenticated { .. } => "authenticated",
        }
    }
}

/// Explicit session context handed to the screens.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Session { store }
    }

    pub fn state(&self) -> Result<SessionState, StoreError> {
        SessionState::from_store(&self.store)
    }

    /// Stored token, if any.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        self.store.get(Key::Token)
    }

    /// Login succeeded: remember the phone and the issued code.
    pub fn code_sent(&mut self, phone: &str, code: &str) -> Result<SessionState, StoreError> {
        self.commit(SessionState::PendingVerification {
            phone: phone.to_string(),
            code: code.to_string(),
        })
    }

    /// Verification succeeded: keep the token, forget the one-time code.
    pub fn verified(&mut self, token: &str) -> Result<SessionState, StoreError> {
        self.commit(SessionState::Authenticated {
            token: token.to_string(),
        })
    }

    /// Explicit logout or a 401 from the server.
    pub fn sign_out(&mut self) -> Result<SessionState, StoreError> {
        self.commit(SessionState::Anonymous)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rewrite the store, in a single write, so it holds exactly the
    /// entries of `next`.
    fn commit(&mut self, next: SessionState) -> Result<SessionState, StoreError> {
        let entries: Vec<(Key, &str)> = match &next {
            SessionState::Anonymous => Vec::new(),
            SessionState::PendingVerification { phone, code } => {
                vec![(Key::Phone, phone.as_str()), (Key::Code, code.as_str())]
            }
            SessionState::Authenticated { token } => vec![(Key::Token, token.as_str())],
        };
        self.store.replace(&entries)?;
        info!(state = next.name(), "session state changed");
        Ok(next)
    }
}
