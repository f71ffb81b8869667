use thiserror::Error;

/// Misuse of a parameter vocabulary or option set.
///
/// These are caller mistakes and are always returned, never logged away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("'{name}' is not a known {vocabulary} parameter")]
    Unknown { vocabulary: &'static str, name: String },

    #[error("index {index} is out of range for an option set of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("'{name}' is already present at position {position}")]
    Duplicate { name: &'static str, position: usize },
}

/// Failure of a single API call or of a chained query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The shared HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The blocking wrapper could not start its runtime.
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The request never produced a response.
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    /// The body was not the JSON shape we expected.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Geocoding returned no locations for the given name.
    #[error("No location found for '{0}'")]
    NotFound(String),
}

impl QueryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotFound(_))
    }
}
