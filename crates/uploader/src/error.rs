use haste_core::ServerUrlError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a usable response.
    Transport,
    /// The server answered, but not with a document key.
    Protocol,
    /// Rejected before any request was sent.
    Input,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request for chunk {chunk} to {endpoint} failed: {source}")]
    Transport {
        chunk: usize,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server answered chunk {chunk} with HTTP {status}: {body}")]
    HttpStatus {
        chunk: usize,
        status: u16,
        body: String,
    },

    #[error("server reply for chunk {chunk} carries no document key: {source}")]
    Protocol {
        chunk: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    InvalidServer(#[from] ServerUrlError),

    #[error("nothing to upload: content is empty")]
    EmptyContent,
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Client(_) | Self::Transport { .. } | Self::HttpStatus { .. } => {
                ErrorKind::Transport
            }
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::InvalidServer(_) | Self::EmptyContent => ErrorKind::Input,
        }
    }

    /// Index of the chunk whose upload failed, when one was attempted.
    pub fn chunk(&self) -> Option<usize> {
        match self {
            Self::Transport { chunk, .. }
            | Self::HttpStatus { chunk, .. }
            | Self::Protocol { chunk, .. } => Some(*chunk),
            _ => None,
        }
    }
}
