// Error taxonomy for a single upload attempt.
//
// Every variant is terminal for the attempt: the session moves to
// `Failed(user_message())` and the user has to start a new upload.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    /// Upload requested with nothing selected. No request is sent.
    #[error("Please select a PDF file first!")]
    NoSelection,

    /// The request never produced an HTTP response (DNS, connect, reset...).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Success status, but the body carried an `error` field.
    #[error("{0}")]
    Rejected(String),

    /// The body could not be read as one of the known response shapes.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    /// Text shown to the user after the `Error: ` prefix.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Transport(err.to_string())
    }
}
