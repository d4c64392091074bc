//! Frontend Errors
//!
//! Every failure here is non-fatal: the sync controller turns it into a
//! dismissible notice and re-fetches the menu.

use thiserror::Error;

use crate::models::MenuId;

pub type MenuResult<T> = Result<T, MenuError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    /// Stale id, usually after an edit made elsewhere
    #[error("menu item {0} no longer exists")]
    NotFound(MenuId),

    #[error("{0}")]
    Validation(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("not authorized, please sign in again")]
    Unauthorized,

    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed menu: {0}")]
    Malformed(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for MenuError {
    fn from(e: reqwest::Error) -> Self {
        MenuError::Request(e.to_string())
    }
}

impl From<serde_json::Error> for MenuError {
    fn from(e: serde_json::Error) -> Self {
        MenuError::Malformed(e.to_string())
    }
}
