//! Session state — the client-held record of the current access token.
//!
//! The session is an explicit context object owned by the `ApiClient`, not a
//! global. Reads are public; mutation is crate-internal so only the refresh
//! coordinator and the auth store can touch the token.

mod storage;

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::warn;

pub use storage::{
    FileSessionStorage, MemorySessionStorage, PersistedSession, SessionStorage, SESSION_FILE,
    STATE_FILES,
};

/// Observable lifecycle of the session, published on a watch channel.
/// `Expired` is the "redirect to sign-in" signal: the refresh endpoint failed
/// and the session has already been cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn,
    Expired,
}

struct SessionInner {
    access_token: Option<String>,
}

/// Handle to the single session shared by the client and all stores.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionInner>>,
    storage: Arc<dyn SessionStorage>,
    state_tx: Arc<watch::Sender<SessionState>>,
}

impl SessionHandle {
    /// Rehydrates the session from storage. A persisted token means the user
    /// is still logged in; everything else starts signed out.
    pub fn load(storage: Arc<dyn SessionStorage>) -> Self {
        let access_token = match storage.load() {
            Ok(Some(persisted)) => persisted.access_token,
            Ok(None) => None,
            Err(e) => {
                warn!("failed to rehydrate session: {e}");
                None
            }
        };
        let initial = if access_token.is_some() {
            SessionState::SignedIn
        } else {
            SessionState::SignedOut
        };
        let (state_tx, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Mutex::new(SessionInner { access_token })),
            storage,
            state_tx: Arc::new(state_tx),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("session lock poisoned")
            .access_token
            .clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner
            .lock()
            .expect("session lock poisoned")
            .access_token
            .is_some()
    }

    /// Watch the session lifecycle. Embedders use this to route the user to
    /// sign-in when the state flips to `Expired`.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Installs (or removes) the access token and persists the new record.
    /// Crate-internal: called by the refresh coordinator on renewal and by
    /// the auth store after an external sign-in.
    pub(crate) fn set_tokens(&self, access_token: Option<String>) {
        let logged_in = access_token.is_some();
        {
            let mut inner = self.inner.lock().expect("session lock poisoned");
            inner.access_token = access_token.clone();
        }
        if let Err(e) = self.storage.save(&PersistedSession { access_token }) {
            warn!("failed to persist session: {e}");
        }
        let _ = self.state_tx.send(if logged_in {
            SessionState::SignedIn
        } else {
            SessionState::SignedOut
        });
    }

    /// Clears the token and removes the persisted record.
    pub(crate) fn clear(&self) {
        self.clear_with_state(SessionState::SignedOut);
    }

    /// Clears the token after a failed refresh and publishes `Expired`.
    pub(crate) fn expire(&self) {
        self.clear_with_state(SessionState::Expired);
    }

    fn clear_with_state(&self, state: SessionState) {
        {
            let mut inner = self.inner.lock().expect("session lock poisoned");
            inner.access_token = None;
        }
        if let Err(e) = self.storage.clear() {
            warn!("failed to clear persisted session: {e}");
        }
        let _ = self.state_tx.send(state);
    }

    pub(crate) fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }
}
