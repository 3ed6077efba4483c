use thiserror::Error;

use crate::form::FormError;

/// Failures surfaced by the transport, the resolver and the views.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response; `body` is the raw response text.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("decode error: {0}")]
    Decode(String),

    /// A route parameter that is not a movie identifier.
    #[error("invalid movie id: {0:?}")]
    InvalidId(String),

    /// An operation that needs a persisted record was given a new one.
    #[error("movie has no id")]
    MissingId,

    #[error(transparent)]
    Form(#[from] FormError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
