//! Session/Identity Adapter — wraps the external identity provider.
//!
//! The rest of the system only needs the current actor's identifier for
//! ownership checks; everything else about authentication (token issuance,
//! profile storage) belongs to the external provider. [`IdentityProvider`]
//! is the seam, [`InMemoryIdentityProvider`] the test double.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;

/// Event name emitted when the authenticated actor changes.
#[cfg(feature = "emitter")]
pub const AUTH_CHANGED: &str = "auth.changed";

/// The authenticated actor as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Sign-in credentials forwarded to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Error type for identity operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidCredentials,
    /// Provider unreachable; retryable by the caller.
    Unavailable(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidCredentials => write!(f, "invalid credentials"),
            SessionError::Unavailable(msg) => {
                write!(f, "identity provider unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Abstract identity provider.
///
/// Implementations must not hang: provider failures surface as
/// [`SessionError::Unavailable`] rather than blocking the caller.
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in actor, if any.
    fn current_actor(&self) -> Option<Identity>;

    /// Authenticate and make the actor current.
    fn sign_in(&self, credentials: &Credentials) -> Result<Identity, SessionError>;

    /// Clear the current actor.
    fn sign_out(&self);
}

/// In-memory identity provider for tests and development.
///
/// Accounts are registered up front; sign-in matches email + password.
/// With the `emitter` feature, every actor change emits [`AUTH_CHANGED`]
/// with the new actor id (empty string on sign-out).
pub struct InMemoryIdentityProvider {
    accounts: HashMap<String, (String, Identity)>,
    current: Mutex<Option<Identity>>,
    #[cfg(feature = "emitter")]
    emitter: Mutex<EventEmitter>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            current: Mutex::new(None),
            #[cfg(feature = "emitter")]
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    /// Register an account the provider will accept.
    pub fn with_account(mut self, password: impl Into<String>, identity: Identity) -> Self {
        self.accounts
            .insert(identity.email.clone(), (password.into(), identity));
        self
    }

    /// Listen for actor changes. The listener receives the new actor id,
    /// or an empty string after sign-out.
    #[cfg(feature = "emitter")]
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.on(AUTH_CHANGED, listener);
        }
    }

    #[cfg(feature = "emitter")]
    fn notify_change(&self, actor_id: &str) {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.emit(AUTH_CHANGED, actor_id.to_string());
        }
    }

    #[cfg(not(feature = "emitter"))]
    fn notify_change(&self, _actor_id: &str) {}
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn current_actor(&self) -> Option<Identity> {
        self.current.lock().ok().and_then(|c| c.clone())
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<Identity, SessionError> {
        let (password, identity) = self
            .accounts
            .get(&credentials.email)
            .ok_or(SessionError::InvalidCredentials)?;
        if *password != credentials.password {
            return Err(SessionError::InvalidCredentials);
        }

        let mut current = self
            .current
            .lock()
            .map_err(|_| SessionError::Unavailable("session lock poisoned".into()))?;
        *current = Some(identity.clone());
        drop(current);

        self.notify_change(&identity.id);
        Ok(identity.clone())
    }

    fn sign_out(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        self.notify_change("");
    }
}
