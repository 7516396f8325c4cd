//! Auth store — token installation, logout, forced logout and account
//! withdrawal. The sign-in flow itself happens outside this crate (browser
//! redirect); the token it produces is installed here.

use tracing::error;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::session::SessionHandle;

#[derive(Clone)]
pub struct AuthStore {
    client: ApiClient,
}

impl AuthStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &SessionHandle {
        self.client.session()
    }

    /// Installs an access token obtained from an external sign-in and
    /// persists it. Passing `None` drops the token without a server call.
    pub fn set_tokens(&self, access_token: Option<String>) {
        self.session().set_tokens(access_token);
    }

    /// Server-side logout, then local cleanup: session cleared and every
    /// persisted client state file removed.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self.client.post("/auth/logout").send().await?;
        response.error_for_status().await?;
        self.session().clear();
        if let Err(e) = self.session().storage().wipe_all() {
            error!("logout: failed to wipe client state: {e}");
        }
        Ok(())
    }

    /// Local-only cleanup for unrecoverable auth failures (the refresh token
    /// is gone or rejected). No server call.
    pub fn force_logout(&self) {
        self.session().clear();
        if let Err(e) = self.session().storage().wipe_all() {
            error!("forced logout: failed to wipe client state: {e}");
        }
    }

    /// Deletes the account, then clears all local state.
    pub async fn withdraw(&self) -> Result<(), ApiError> {
        let response = self.client.delete("/auth/withdraw").send().await?;
        if let Err(e) = response.error_for_status().await {
            error!("withdrawal failed: {e}");
            return Err(e);
        }
        self.session().clear();
        if let Err(e) = self.session().storage().wipe_all() {
            error!("withdrawal: failed to wipe client state: {e}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::session::{MemorySessionStorage, PersistedSession, SessionStorage};

    async fn store_with_token(server: &MockServer) -> (AuthStore, Arc<MemorySessionStorage>) {
        let storage = Arc::new(MemorySessionStorage::default());
        storage
            .save(&PersistedSession {
                access_token: Some("tok".into()),
            })
            .unwrap();
        let config = Config {
            api_base_url: server.uri(),
            state_dir: std::env::temp_dir(),
            http_timeout_secs: 5,
            rust_log: "info".into(),
        };
        let client = ApiClient::new(&config, storage.clone()).unwrap();
        (AuthStore::new(client), storage)
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_storage() {
        let server = MockServer::start().await;
        let (store, storage) = store_with_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        store.logout().await.unwrap();

        assert!(!store.session().is_logged_in());
        assert!(storage.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_session() {
        let server = MockServer::start().await;
        let (store, _) = store_with_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(store.logout().await.is_err());
        assert!(store.session().is_logged_in());
    }

    #[tokio::test]
    async fn test_force_logout_needs_no_server() {
        let server = MockServer::start().await;
        let (store, storage) = store_with_token(&server).await;

        store.force_logout();

        assert!(!store.session().is_logged_in());
        assert!(storage.load().unwrap().is_none());
    }
}
