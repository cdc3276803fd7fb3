use thiserror::Error;

/// Failure talking to the TTS backend.
///
/// A well-formed `{"success": false, "error": ...}` body is not an `ApiError`;
/// it comes back as a normal response so the server message can be shown.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with HTTP {status}: {body}")]
    Response {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response from {url}: {message}")]
    Format { url: String, message: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
