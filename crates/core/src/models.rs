use std::borrow::Cow;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds credentials only when both halves are present.
    pub fn from_pair(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) => Some(Self { username, password }),
            _ => None,
        }
    }

    /// Value for an HTTP `Authorization` header.
    pub fn basic_authorization(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentKeyResponse {
    pub key: String,
}

/// Decodes a paste server reply. Anything other than a JSON object with a
/// string `key` is rejected.
pub fn parse_document_key(body: &str) -> Result<String, serde_json::Error> {
    serde_json::from_str::<DocumentKeyResponse>(body).map(|payload| payload.key)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub key: String,
    pub link: String,
    pub chunk_count: usize,
}

/// Request body for one chunk: the chunk itself, followed by the link of the
/// chunk uploaded before it.
pub fn chain_payload<'a>(chunk: &'a str, previous_link: Option<&str>) -> Cow<'a, str> {
    match previous_link {
        Some(link) => {
            let mut body = String::with_capacity(chunk.len() + link.len() + 1);
            body.push_str(chunk);
            body.push('\n');
            body.push_str(link);
            Cow::Owned(body)
        }
        None => Cow::Borrowed(chunk),
    }
}
