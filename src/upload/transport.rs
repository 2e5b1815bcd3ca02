/// Transport for the document-management endpoint
///
/// The pipeline only ever sees this trait and a status-only response, so
/// tests can script outcomes without a server. The real implementation posts
/// the multipart body with basic auth over reqwest.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart;
use thiserror::Error;
use tracing::debug;

use super::payload::{FilePart, UploadForm, FILE_FIELD};

/// Where uploads go and who they authenticate as.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

impl Default for UploadTarget {
    fn default() -> Self {
        Self {
            endpoint: "https://34.201.232.224/alfresco/service/mis/uploadNew.json".to_string(),
            username: "rsvuser".to_string(),
            password: "User@123".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP layer failed after a connection was established.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// No response reached us at all.
    #[error("no response from endpoint: {0}")]
    NoResponse(String),
}

/// Status-only view of the endpoint's answer. The response body is never
/// interpreted.
#[derive(Debug, Clone, Copy)]
pub struct UploadResponse {
    pub status: u16,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn submit(
        &self,
        form: UploadForm,
        target: &UploadTarget,
    ) -> Result<UploadResponse, TransportError>;
}

/// Transport backed by a real HTTP client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn submit(
        &self,
        form: UploadForm,
        target: &UploadTarget,
    ) -> Result<UploadResponse, TransportError> {
        let UploadForm { file, fields } = form;
        let FilePart {
            file_name,
            mime,
            bytes,
        } = file;

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime)?;

        let mut body = multipart::Form::new().part(FILE_FIELD, part);
        for (key, value) in fields {
            body = body.text(key, value);
        }

        let response = self
            .client
            .post(&target.endpoint)
            .basic_auth(&target.username, Some(&target.password))
            .multipart(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    TransportError::NoResponse(e.to_string())
                } else {
                    TransportError::Http(e)
                }
            })?;

        let status = response.status().as_u16();
        debug!("endpoint answered {} for {}", status, file_name);

        Ok(UploadResponse { status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_the_2xx_class() {
        assert!(UploadResponse { status: 200 }.is_success());
        assert!(UploadResponse { status: 204 }.is_success());
        assert!(UploadResponse { status: 299 }.is_success());
        assert!(!UploadResponse { status: 199 }.is_success());
        assert!(!UploadResponse { status: 300 }.is_success());
        assert!(!UploadResponse { status: 401 }.is_success());
        assert!(!UploadResponse { status: 500 }.is_success());
    }

    #[test]
    fn test_default_target_matches_the_endpoint_contract() {
        let target = UploadTarget::default();
        assert!(target.endpoint.starts_with("https://"));
        assert!(target.endpoint.ends_with("/uploadNew.json"));
        assert_eq!(target.username, "rsvuser");
    }
}
