//! Frontend Models
//!
//! Data structures exchanged with the menu API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, MenuResult};

/// Menu item identifier as issued by the backend.
///
/// The API hands out numeric or string ids; either is kept verbatim and
/// serialized back in the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuId {
    Num(u64),
    Text(String),
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuId::Num(n) => write!(f, "{}", n),
            MenuId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for MenuId {
    fn from(n: u64) -> Self {
        MenuId::Num(n)
    }
}

impl From<&str> for MenuId {
    fn from(s: &str) -> Self {
        MenuId::Text(s.to_string())
    }
}

impl From<String> for MenuId {
    fn from(s: String) -> Self {
        MenuId::Text(s)
    }
}

/// Menu node as served by `GET /menu` (nested)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

// ========================
// Request Bodies
// ========================

/// `POST /menu`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItem {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MenuId>,
}

impl CreateMenuItem {
    pub fn new(text: &str, url: Option<&str>, parent_id: Option<MenuId>) -> MenuResult<Self> {
        Ok(Self {
            text: validate_label(text)?,
            url: normalize_url(url),
            parent_id,
        })
    }
}

/// `PUT /menu/{id}` with label/link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditMenuItem {
    pub text: String,
    pub url: Option<String>,
}

impl EditMenuItem {
    pub fn new(text: &str, url: Option<&str>) -> MenuResult<Self> {
        Ok(Self {
            text: validate_label(text)?,
            url: normalize_url(url),
        })
    }
}

/// `PUT /menu/{id}` with a move; `parentId` is the parent before the move
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMenuItem {
    pub order: u32,
    pub parent_id: Option<MenuId>,
    pub new_parent_id: Option<MenuId>,
}

/// Labels must contain something other than whitespace
pub fn validate_label(text: &str) -> MenuResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(MenuError::Validation("Menu label is required".to_string()));
    }
    Ok(text.to_string())
}

/// Blank links mean "no link"
pub fn normalize_url(url: Option<&str>) -> Option<String> {
    url.map(str::trim).filter(|u| !u.is_empty()).map(str::to_string)
}
