use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::warn;

use crate::config::UploaderConfig;
use crate::error::UploadError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MAX_ERROR_BODY_CHARS: usize = 512;
const UNREADABLE_BODY: &str = "<unreadable body>";

/// One document POST.
#[derive(Debug, Clone, Copy)]
pub struct DocumentRequest<'a> {
    pub chunk: usize,
    pub endpoint: &'a str,
    pub body: &'a str,
    pub authorization: Option<&'a str>,
}

pub trait PasteTransport: Send + Sync {
    /// Sends one document and returns the raw reply text of a 2xx response.
    async fn post_document(&self, request: DocumentRequest<'_>) -> Result<String, UploadError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(config: &UploaderConfig) -> Result<Self, UploadError> {
        let (connect_timeout, request_timeout) = config.effective_timeouts();

        // No idle pool: every connection is closed once its response is read.
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(UploadError::Client)?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

impl PasteTransport for HttpTransport {
    async fn post_document(&self, request: DocumentRequest<'_>) -> Result<String, UploadError> {
        let transport_error = |source: reqwest::Error| UploadError::Transport {
            chunk: request.chunk,
            endpoint: request.endpoint.to_string(),
            source,
        };

        // The body goes out raw even though the content type says form data;
        // hastebin servers read it as-is.
        let mut builder = self
            .client
            .post(request.endpoint)
            .header(CONTENT_LENGTH, request.body.len())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(USER_AGENT, self.user_agent.as_str())
            .body(request.body.to_owned());
        if let Some(authorization) = request.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::HttpStatus {
                chunk: request.chunk,
                status: status.as_u16(),
                body: error_body(response.text().await),
            });
        }

        response.text().await.map_err(transport_error)
    }
}

/// Trimmed reply text of a failed request, for diagnostics.
fn error_body(read: Result<String, reqwest::Error>) -> String {
    match read {
        Ok(body) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        Err(error) => {
            warn!(error = %error, "failed reading error response body");
            UNREADABLE_BODY.to_string()
        }
    }
}
