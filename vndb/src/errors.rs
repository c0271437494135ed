use thiserror::Error;

/// Failures talking to the VNDB Kana API. These never leave the adapter:
/// they are rendered into a single error record for the model to read.
#[derive(Error, Debug)]
pub enum VndbError {
    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("VNDB API error ({status}): {body}")]
    HttpError { status: u16, body: String },

    #[error("Invalid filters JSON: {0}")]
    InvalidFilters(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
}

/// Why a random visual novel could not be drawn
#[derive(Error, Debug)]
pub enum RandomPickError {
    #[error("Could not find any VN matching the filters to select a random one from. Details: {0}")]
    NoMatch(String),

    #[error("Failed to parse a valid maximum ID. Got: {0}")]
    MalformedId(String),

    #[error(transparent)]
    Query(#[from] VndbError),
}

pub type VndbResult<T> = Result<T, VndbError>;
