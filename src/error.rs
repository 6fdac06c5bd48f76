use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Everything that can go wrong inside the ledger core and its peer plumbing.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("transaction is missing required fields: {}", .missing.join(", "))]
    MalformedTransaction { missing: Vec<&'static str> },

    #[error("ledger has no genesis block")]
    EmptyChain,

    #[error("peer {address} unreachable: {reason}")]
    PeerUnreachable { address: String, reason: String },

    #[error("peer {address} sent an invalid chain: {reason}")]
    InvalidPeerChain { address: String, reason: String },

    #[error("peer address has no network location: {0:?}")]
    InvalidPeerAddress(String),

    #[error("mining aborted: {0}")]
    MiningAborted(String),
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::MalformedTransaction { .. } | LedgerError::InvalidPeerAddress(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
