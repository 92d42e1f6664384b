//! mathhelper-gateway: the only component that talks to the remote equations API.
//!
//! Endpoints (relative to the configured base URL):
//!   GET    equations?page&sortBy&pageSize&desc   list
//!   GET    equations/{id}                        get
//!   POST   equations                             create, answers with `Location`
//!   DELETE equations/{id}                        delete
//!   POST   equations/{id}/solutions?x={value}    propose a solution

pub mod http;
pub mod message;
pub mod query;

use async_trait::async_trait;
use mathhelper_common::{Equation, EquationId, MathHelperError};
use thiserror::Error;

pub use http::HttpEquationGateway;
pub use message::clean_validation_message;
pub use query::ListQuery;

/// Collection path under the API base URL.
pub const COLLECTION_PATH: &str = "equations";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection refused, DNS failure, timeout and the like.
    #[error("Transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Rejected by server [{status}]: {message}")]
    Rejected { status: u16, message: String },

    #[error("Equation not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Create was accepted but the response carried no Location header")]
    MissingLocation,

    #[error("Invalid locator: {0}")]
    InvalidLocation(String),

    #[error("Blocked: {0}")]
    Blocked(String),

    #[error("Gateway setup failed: {0}")]
    Setup(String),
}

impl From<MathHelperError> for GatewayError {
    fn from(err: MathHelperError) -> Self {
        match err {
            MathHelperError::SecurityError(msg) => GatewayError::Blocked(msg),
            MathHelperError::Url(e) => GatewayError::InvalidLocation(e.to_string()),
            MathHelperError::Http(e) => GatewayError::Transport(e),
            MathHelperError::Serialization(e) => GatewayError::Decode(e.to_string()),
            other => GatewayError::Setup(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Result of `POST equations`.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// Locator of the new record, absolute or relative to the API base.
    Created { location: String },
    Rejected { message: String },
}

/// Result of `DELETE equations/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    Rejected { message: String },
}

/// Common interface for equation API clients.
#[async_trait]
pub trait EquationGateway: Send + Sync {
    /// Fetch one record; `NotFound` if the server has no such id.
    async fn fetch_by_id(&self, id: EquationId) -> Result<Equation>;

    /// Fetch one record by an absolute or base-relative locator.
    async fn fetch_by_location(&self, location: &str) -> Result<Equation>;

    async fn fetch_all(&self, query: &ListQuery) -> Result<Vec<Equation>>;

    async fn create(&self, equation: &str) -> Result<CreateOutcome>;

    async fn delete(&self, id: EquationId) -> Result<DeleteOutcome>;

    /// True iff the server accepted `value` as a root of the equation.
    async fn try_add_solution(&self, id: EquationId, value: f64) -> Result<bool>;
}
