use thiserror::Error;

/// Failure of a single remote fetch.
///
/// Everything here is technical detail for the logs. Screens turn it into a fixed
/// user-facing message through [`FetchError::user_message`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("{url} not found")]
    NotFound { url: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed record: {0}")]
    Shape(String),
}

/// Which screen is reporting the failure; the wording differs per screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
}

pub const LIST_ERROR_MESSAGE: &str =
    "Something went wrong while loading the movies. Please try again later.";
pub const DETAIL_ERROR_MESSAGE: &str =
    "Something went wrong while loading the movie details. Please try again later.";
pub const DETAIL_NOT_FOUND_MESSAGE: &str = "Movie not found.";

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }

    pub fn user_message(&self, screen: Screen) -> &'static str {
        match screen {
            Screen::List => LIST_ERROR_MESSAGE,
            Screen::Detail if self.is_not_found() => DETAIL_NOT_FOUND_MESSAGE,
            Screen::Detail => DETAIL_ERROR_MESSAGE,
        }
    }
}
