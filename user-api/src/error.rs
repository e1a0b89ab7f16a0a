//! Error taxonomy shared by every operation in this crate.

use crate::credential::Claim;
use crate::types::ChannelSeriesType;

/// Boxed transport failure carried by [`Error::Network`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way an operation can fail.
///
/// Credential, catalog, transport and application-level failures each have their own variant so
/// that callers can branch on the cause. Nothing in this crate retries on any of them.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The credential lacks a claim the operation requires.
    ///
    /// Raised before any request is sent.
    #[error("credential has no {0}")]
    MissingCredential(Claim),

    /// The catalog has no endpoint registered under the given logical name.
    #[error("no endpoint registered for operation `{0}`")]
    UnknownOperation(String),

    /// The HTTP client could not be set up from its configuration.
    #[error("build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    /// The request never produced a response.
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The server answered with a non-success HTTP status.
    #[error("{url} responded with status {status}: {body}")]
    Response {
        status: u16,
        url: String,
        body: String,
    },

    /// The HTTP exchange succeeded but the payload carries an error code.
    #[error("API error {code}: {message}")]
    ResponseCode { code: i64, message: String },

    /// No season or series with the given id exists for the owner.
    #[error("no {kind} with id {id} found")]
    CollectionNotFound { kind: ChannelSeriesType, id: u64 },

    /// A payload (or a JSON document embedded in one) could not be parsed.
    #[error("decode JSON payload")]
    Decode(#[from] serde_json::Error),

    /// A container this crate needs to reshape is missing from the payload.
    #[error("response is missing `{0}`")]
    MalformedResponse(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
