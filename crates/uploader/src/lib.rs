mod config;
mod error;
mod transport;

use std::sync::Arc;
use std::time::Instant;

use haste_core::{
    chain_payload, parse_document_key, split_into_chunks, Credentials, ServerUrl, UploadResult,
};
use haste_observability::UploadMetrics;
use tracing::{debug, info, instrument, warn};

pub use config::{UploaderConfig, DEFAULT_USER_AGENT};
pub use error::{ErrorKind, UploadError};
pub use transport::{DocumentRequest, HttpTransport, PasteTransport};

/// Uploads content to a hastebin server as a chain of linked documents.
///
/// Each chunk after the first ends with a line holding the link of the chunk
/// before it, so the returned link (the last document) leads back through
/// the whole upload.
pub struct Uploader<T = HttpTransport> {
    transport: T,
    config: UploaderConfig,
    metrics: Arc<UploadMetrics>,
}

impl Uploader<HttpTransport> {
    pub fn new(config: UploaderConfig, metrics: Arc<UploadMetrics>) -> Result<Self, UploadError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config, metrics))
    }
}

impl<T> Uploader<T>
where
    T: PasteTransport,
{
    pub fn with_transport(transport: T, config: UploaderConfig, metrics: Arc<UploadMetrics>) -> Self {
        Self {
            transport,
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<UploadMetrics> {
        &self.metrics
    }

    /// Splits `content` and uploads every chunk in order.
    #[instrument(skip(self, content, credentials), fields(bytes = content.len()))]
    pub async fn upload(
        &self,
        content: &str,
        server: &str,
        credentials: Option<&Credentials>,
    ) -> Result<UploadResult, UploadError> {
        let server = ServerUrl::parse(server)?;
        let chunks = split_into_chunks(content, self.config.max_chunk_chars);
        self.upload_all(&chunks, &server, credentials).await
    }

    /// Uploads pre-split chunks in order, stopping at the first failure.
    ///
    /// Documents uploaded before a failure stay on the server; their links are
    /// not reported.
    #[instrument(skip(self, chunks, credentials), fields(server = %server, chunks = chunks.len()))]
    pub async fn upload_all(
        &self,
        chunks: &[&str],
        server: &ServerUrl,
        credentials: Option<&Credentials>,
    ) -> Result<UploadResult, UploadError> {
        self.metrics.inc_operation();

        let endpoint = server.documents_endpoint();
        let authorization = credentials.map(Credentials::basic_authorization);
        let mut last: Option<UploadResult> = None;

        for (index, chunk) in chunks.iter().enumerate() {
            let body = chain_payload(chunk, last.as_ref().map(|result| result.link.as_str()));
            let started = Instant::now();

            let key = match self
                .upload_chunk(index, &endpoint, &body, authorization.as_deref())
                .await
            {
                Ok(key) => key,
                Err(error) => {
                    self.metrics.inc_failure();
                    warn!(chunk = index, error = %error, "chunk upload failed");
                    return Err(error);
                }
            };

            self.metrics.record_chunk(body.len(), started.elapsed());
            let link = server.link_for(&key);
            info!(chunk = index, bytes = body.len(), key = %key, "chunk uploaded");

            last = Some(UploadResult {
                key,
                link,
                chunk_count: index + 1,
            });
        }

        last.ok_or(UploadError::EmptyContent)
    }

    async fn upload_chunk(
        &self,
        chunk: usize,
        endpoint: &str,
        body: &str,
        authorization: Option<&str>,
    ) -> Result<String, UploadError> {
        debug!(chunk, bytes = body.len(), "posting document");
        let reply = self
            .transport
            .post_document(DocumentRequest {
                chunk,
                endpoint,
                body,
                authorization,
            })
            .await?;

        parse_document_key(&reply).map_err(|source| UploadError::Protocol { chunk, source })
    }
}

/// Uploads `content` with settings from the environment and returns the link
/// of the last document in the chain.
pub async fn upload_to_hastebin(
    content: &str,
    server: &str,
    credentials: Option<&Credentials>,
) -> Result<String, UploadError> {
    let uploader = Uploader::new(UploaderConfig::from_env(), UploadMetrics::shared())?;
    let result = uploader.upload(content, server, credentials).await?;
    Ok(result.link)
}
