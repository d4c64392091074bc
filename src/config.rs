//! Application Configuration
//!
//! Build-time defaults, optionally overridden in the browser by a global
//! `window.__MENU_ADMIN_CONFIG__` object holding any subset of the fields.

use serde::Deserialize;
use tracing::warn;

use crate::error::{MenuError, MenuResult};

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

#[cfg(target_arch = "wasm32")]
const GLOBAL_CONFIG_KEY: &str = "__MENU_ADMIN_CONFIG__";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Base of the menu endpoints, without trailing slash
    pub api_base_url: String,
    /// How long info notices stay up; error notices wait for a dismiss
    pub notice_timeout_ms: u32,
    /// Lines kept by the activity log
    pub log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("MENU_API_URL").unwrap_or(DEFAULT_API_BASE_URL).to_string(),
            notice_timeout_ms: 5000,
            log_capacity: 500,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with the page-provided object, if any
    pub fn load() -> Self {
        let config = Self::from_page().unwrap_or_default();
        config.normalized().unwrap_or_else(|e| {
            warn!("{}; using defaults", e);
            Self::default()
        })
    }

    fn normalized(mut self) -> MenuResult<Self> {
        let base = self.api_base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(MenuError::Config("apiBaseUrl is empty".to_string()));
        }
        self.api_base_url = base.to_string();
        Ok(self)
    }

    #[cfg(target_arch = "wasm32")]
    fn from_page() -> Option<Self> {
        let window = web_sys::window()?;
        let raw = js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str(GLOBAL_CONFIG_KEY)).ok()?;
        if raw.is_undefined() || raw.is_null() {
            return None;
        }
        match serde_wasm_bindgen::from_value(raw) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("ignoring {}: {}", GLOBAL_CONFIG_KEY, e);
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_page() -> Option<Self> {
        None
    }
}
