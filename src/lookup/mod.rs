//! Clients for the external data sources.
//!
//! Both sources sit behind a trait so the resolver can be exercised with
//! stubs. The HTTP implementations talk to PubChem PUG-REST and the MediaWiki
//! action API. Every request carries the configured User-Agent and is bounded
//! by the configured timeout.

mod pubchem;
mod wikipedia;

pub use pubchem::PubChemClient;
pub use wikipedia::WikipediaClient;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{CompoundRecord, Page};

/// Lookup failures. "Not found" is not an error: clients report it as an
/// empty list or `None`.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Timeout
        } else if e.is_decode() {
            LookupError::Decode(e.to_string())
        } else {
            LookupError::Http(e)
        }
    }
}

/// A chemical database searchable by structure or by name.
#[async_trait]
pub trait CompoundDatabase: Send + Sync {
    /// Records matching a SMILES string, best match first. Empty if none.
    async fn lookup_by_smiles(&self, smiles: &str) -> Result<Vec<CompoundRecord>, LookupError>;

    /// Records matching a compound name, best match first. Empty if none.
    async fn lookup_by_name(&self, name: &str) -> Result<Vec<CompoundRecord>, LookupError>;
}

/// An encyclopedia that returns at most one page per title.
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// The page titled `query`, or `None` if it does not exist.
    async fn get_page(&self, query: &str) -> Result<Option<Page>, LookupError>;
}

/// Reads the body of a failed response into a [`LookupError::Status`].
pub(crate) async fn status_error(response: reqwest::Response) -> LookupError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    LookupError::Status { status, body }
}
