use thiserror::Error;

/// Errors surfaced by the chain facade.
///
/// Transport and response errors stay inside the connection worker (the UI
/// sees them as failure events); account and payload errors are returned
/// directly to the caller.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response for `{method}`: {reason}")]
    BadResponse {
        method: &'static str,
        reason: String,
    },

    #[error("no burner account selected")]
    NoAccount,

    #[error("unknown account address: {0}")]
    UnknownAccount(String),

    #[error("burner payload rejected: {0}")]
    Payload(String),
}
