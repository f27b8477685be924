//! Persistence for the subject list: a REST API with a local JSON file
//! as fallback.

pub mod gateway;
pub mod local;
pub mod remote;

pub use gateway::{Backend, Gateway};
pub use local::LocalStore;
pub use remote::RemoteApi;

use crate::schedule::SubjectError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed subject data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Subject(#[from] SubjectError),
}
