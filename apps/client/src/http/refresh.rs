//! Single-flight token refresh.
//!
//! State machine with two states. IDLE: the first 401 promotes its request's
//! task to refresh leader. REFRESHING: every other 401 parks on the waiter
//! queue instead of issuing its own refresh call. The queue is taken and the
//! state reset to IDLE atomically when the refresh settles; only then are the
//! waiters completed, in enqueue order. Replayed requests race freely after
//! that.

use std::sync::Mutex;

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::http::{ClientInner, REFRESH_PATH};

/// Outcome delivered to each parked waiter. The fresh token is not carried
/// here; replays re-read it from the session at dispatch time.
type RefreshOutcome = Result<(), RefreshFailed>;

#[derive(Debug, Clone, Copy)]
struct RefreshFailed;

enum RefreshState {
    Idle,
    Refreshing(Vec<oneshot::Sender<RefreshOutcome>>),
}

pub(crate) struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

enum Role {
    Leader,
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(RefreshState::Idle),
        }
    }

    /// Parks the caller until a token refresh settles. At most one refresh
    /// call is in flight at any time; on failure every parked caller gets
    /// `SessionExpired` and the session is cleared.
    pub(crate) async fn wait_for_refresh(&self, client: &ClientInner) -> Result<(), ApiError> {
        let role = {
            let mut state = self.state.lock().expect("refresh state poisoned");
            match &mut *state {
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing(Vec::new());
                    Role::Leader
                }
                RefreshState::Refreshing(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Role::Waiter(rx)
                }
            }
        };

        match role {
            Role::Leader => self.lead_refresh(client).await,
            Role::Waiter(rx) => match rx.await {
                Ok(Ok(())) => Ok(()),
                _ => Err(ApiError::SessionExpired),
            },
        }
    }

    async fn lead_refresh(&self, client: &ClientInner) -> Result<(), ApiError> {
        let outcome = request_new_token(client).await;

        // Settle: back to IDLE and take the queue in one step, before any
        // waiter is completed.
        let waiters = {
            let mut state = self.state.lock().expect("refresh state poisoned");
            match std::mem::replace(&mut *state, RefreshState::Idle) {
                RefreshState::Refreshing(waiters) => waiters,
                RefreshState::Idle => Vec::new(),
            }
        };

        match outcome {
            Ok(access_token) => {
                client.session.set_tokens(Some(access_token));
                info!("access token refreshed, replaying {} request(s)", waiters.len() + 1);
                for waiter in waiters {
                    let _ = waiter.send(Ok(()));
                }
                Ok(())
            }
            Err(e) => {
                warn!("token refresh failed: {e}");
                client.session.expire();
                for waiter in waiters {
                    let _ = waiter.send(Err(RefreshFailed));
                }
                Err(ApiError::SessionExpired)
            }
        }
    }
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

/// The refresh call itself. One attempt, no backoff; any failure is terminal
/// for the whole pending batch. The refresh token travels as a cookie.
async fn request_new_token(client: &ClientInner) -> Result<String, ApiError> {
    let url = format!("{}{}", client.base_url, REFRESH_PATH);
    let mut builder = client.http.post(&url).json(&serde_json::json!({}));
    if let Some(token) = client.session.access_token() {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = builder.send().await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    let parsed: RefreshResponse = serde_json::from_str(&response.text().await?)?;
    Ok(parsed.access_token)
}
