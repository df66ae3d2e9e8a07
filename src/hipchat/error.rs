use thiserror::Error;

/// Failure of a single call to the HipChat API.
///
/// Transport, authorization and application errors are not told apart by
/// callers; they only need the message for logs and the error response.
#[derive(Error, Debug)]
pub enum ChatApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HipChat returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode HipChat response: {0}")]
    Decode(String),

    #[error("Invalid HipChat URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid room id: {0:?}")]
    InvalidRoomId(String),

    #[error("Listing spans more than {0} pages")]
    PageLimit(usize),
}
