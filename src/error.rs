//! Error types for the newsletter pipeline.
//!
//! Failures fall into two groups. Degradable ones (a page that cannot be
//! downloaded, a page whose structure changed, a translation that did not go
//! through) are absorbed close to where they happen: the affected source
//! simply contributes nothing to the run. Fatal ones (broken configuration,
//! database errors, a failed send) propagate out of `main` and abort the run
//! before the snapshot store is touched.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// The source page could not be downloaded, returned a non-success
    /// status, or did not report an HTML content type.
    #[error("error downloading page {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The page downloaded fine but the expected article container is gone.
    #[error("wrong page format: {url}")]
    PageFormat { url: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("configuration is not valid JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP failure: {0}")]
    Send(#[from] lettre::transport::smtp::Error),
}
