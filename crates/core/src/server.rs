use std::fmt;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ServerUrlError {
    #[error("invalid server url {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme {scheme:?} in server url {input:?}, expected http or https")]
    UnsupportedScheme { input: String, scheme: String },
}

/// Base address of a paste server.
///
/// The caller's text is validated but otherwise kept as given, so links come
/// out exactly as `{base}/{key}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerUrl {
    base: String,
}

impl ServerUrl {
    pub fn parse(input: &str) -> Result<Self, ServerUrlError> {
        let base = input.trim();
        let parsed = Url::parse(base).map_err(|source| ServerUrlError::Parse {
            input: input.to_string(),
            source,
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self {
                base: base.to_string(),
            }),
            other => Err(ServerUrlError::UnsupportedScheme {
                input: input.to_string(),
                scheme: other.to_string(),
            }),
        }
    }

    pub fn documents_endpoint(&self) -> String {
        format!("{}/documents", self.base)
    }

    pub fn link_for(&self, key: &str) -> String {
        format!("{}/{}", self.base, key)
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
