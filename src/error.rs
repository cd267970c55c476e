/// Error type shared by the storage, transport and manager layers
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    /// The target context did not answer (closed tab, navigated away, no content script).
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("storage failed: {0}")]
    Storage(String),

    /// A message or stored value could not be converted.
    #[error("malformed payload: {0}")]
    Payload(String),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("url key must not be empty")]
    EmptyUrlKey,

    #[error("no active tab")]
    NoActiveTab,

    #[error("no saved title with id {0}")]
    UnknownEntry(String),
}

impl TitleError {
    pub fn transport(err: impl std::fmt::Debug) -> Self {
        TitleError::Transport(format!("{:?}", err))
    }

    pub fn storage(err: impl std::fmt::Debug) -> Self {
        TitleError::Storage(format!("{:?}", err))
    }

    pub fn payload(err: impl std::fmt::Debug) -> Self {
        TitleError::Payload(format!("{:?}", err))
    }
}
