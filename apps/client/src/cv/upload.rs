//! Presigned-URL upload flow. The backend issues a time-limited URL, the
//! client PUTs the file bytes straight to object storage, then confirms so
//! the backend can register the CV. The raw PUT carries no bearer header;
//! the URL itself is the authorization.

use reqwest::StatusCode;
use tracing::{error, info};

use crate::errors::ApiError;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct UploadStore {
    client: ApiClient,
}

impl UploadStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Asks the backend for an upload URL. A 409 means the file name is
    /// already taken and is translated into a descriptive error.
    pub async fn presigned_upload_url(&self, file_name: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .get("/s3/presigned-url/upload")
            .query("fileName", file_name)
            .send()
            .await?;
        if response.status() == StatusCode::CONFLICT {
            return Err(ApiError::DuplicateFileName(file_name.to_string()));
        }
        response.text().await
    }

    pub async fn presigned_download_url(&self, file_name: &str) -> Result<String, ApiError> {
        let result = self
            .client
            .get("/s3/presigned-url/download")
            .query("fileName", file_name)
            .send()
            .await?
            .text()
            .await;
        if let Err(e) = &result {
            error!("download URL fetch failed for '{file_name}': {e}");
        }
        result
    }

    /// Full upload: presigned URL, raw PUT, confirm. Returns the confirm
    /// status so callers can refresh their CV list afterwards.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StatusCode, ApiError> {
        let url = self.presigned_upload_url(file_name).await?;
        self.put_object(&url, content_type, data).await?;

        let confirm = self
            .client
            .post("/s3/confirm-upload")
            .query("fileName", file_name)
            .send()
            .await?
            .error_for_status()
            .await?;
        info!("upload of '{file_name}' confirmed ({})", confirm.status());
        Ok(confirm.status())
    }

    /// Replaces an existing CV: same PUT, different confirmation endpoint so
    /// the backend keeps the CV id stable.
    pub async fn reupload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
        url: &str,
    ) -> Result<StatusCode, ApiError> {
        self.put_object(url, content_type, data).await?;
        let confirm = self
            .client
            .post("/s3/confirm-re-upload")
            .query("fileName", file_name)
            .send()
            .await?
            .error_for_status()
            .await?;
        Ok(confirm.status())
    }

    /// Renames a stored CV; returns the server's new object name.
    pub async fn rename(&self, old_name: &str, new_name: &str) -> Result<String, ApiError> {
        self.client
            .post("/s3/rename-cv")
            .query("oldFileName", old_name)
            .query("newFileName", new_name)
            .send()
            .await?
            .text()
            .await
    }

    async fn put_object(
        &self,
        url: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<(), ApiError> {
        self.client
            .put_absolute(url)
            .body_bytes(content_type, data)
            .send()
            .await?
            .error_for_status()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::session::{MemorySessionStorage, PersistedSession, SessionStorage};

    async fn store(server: &MockServer) -> UploadStore {
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
        UploadStore::new(ApiClient::new(&config, storage).unwrap())
    }

    #[tokio::test]
    async fn test_conflict_translates_to_duplicate_name() {
        let server = MockServer::start().await;
        let store = store(&server).await;
        Mock::given(method("GET"))
            .and(path("/s3/presigned-url/upload"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let err = store.presigned_upload_url("cv.pdf").await.unwrap_err();
        assert!(matches!(err, ApiError::DuplicateFileName(name) if name == "cv.pdf"));
    }

    #[tokio::test]
    async fn test_upload_puts_bytes_then_confirms() {
        let server = MockServer::start().await;
        let store = store(&server).await;

        // The presigned URL points back at the mock server so the raw PUT is
        // observable too.
        let presigned = format!("{}/bucket/cv.pdf?signature=abc", server.uri());
        Mock::given(method("GET"))
            .and(path("/s3/presigned-url/upload"))
            .and(query_param("fileName", "cv.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_string(&presigned))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/bucket/cv.pdf"))
            .and(header("content-type", "application/pdf"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/s3/confirm-upload"))
            .and(query_param("fileName", "cv.pdf"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let status = store
            .upload("cv.pdf", "application/pdf", b"%PDF-1.7".to_vec())
            .await
            .unwrap();
        assert_eq!(status.as_u16(), 201);

        // The raw PUT must not carry the bearer header.
        let requests = server.received_requests().await.unwrap();
        let put = requests
            .iter()
            .find(|r| r.method.as_str() == "PUT")
            .expect("no PUT observed");
        assert!(!put.headers.contains_key("authorization"));
    }
}
