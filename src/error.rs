use thiserror::Error;

/// Failures talking to the recipe backend. All of them are per-request and
/// terminal; the user re-triggers the action manually.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("invalid server url `{url}`: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Field-level problems with a recipe draft. Both fields are always checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("recipe draft is incomplete")]
pub struct ValidationErrors {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("could not prepare document: {0}")]
    ObjectUrl(String),
    #[error("could not load document: {0}")]
    Load(String),
    #[error("could not render page {page}: {message}")]
    Page { page: u32, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("browser storage is unavailable")]
    Unavailable,
    #[error("could not write `{key}`: {message}")]
    Write { key: String, message: String },
}

/// One aggregated failure for a bulk delete, whatever the number of failed items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to delete {failed} of {total} recipes: {first}")]
pub struct BulkDeleteError {
    pub failed: usize,
    pub total: usize,
    pub first: ClientError,
}
