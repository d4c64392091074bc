//! Menu Commands
//!
//! `reqwest` client for the menu endpoints. In the browser every request
//! carries the session cookie.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::MenuApi;
use crate::config::AppConfig;
use crate::error::{MenuError, MenuResult};
use crate::models::{CreateMenuItem, EditMenuItem, MenuId, MenuItem, MoveMenuItem};

/// Characters escaped when an id becomes a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Longest server body echoed into a notice
const MAX_ERROR_BODY: usize = 200;

pub struct HttpMenuApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMenuApi {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/menu", self.base_url)
    }

    fn item_url(&self, id: &MenuId) -> String {
        format!(
            "{}/menu/{}",
            self.base_url,
            utf8_percent_encode(&id.to_string(), PATH_SEGMENT)
        )
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        debug!("[API] {} {}", method, url);
        let builder = self.client.request(method, url);
        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();
        builder
    }
}

#[async_trait(?Send)]
impl MenuApi for HttpMenuApi {
    async fn fetch_menu(&self) -> MenuResult<Vec<MenuItem>> {
        let response = send(self.request(Method::GET, self.collection_url())).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn create_item(&self, item: &CreateMenuItem) -> MenuResult<()> {
        send(self.request(Method::POST, self.collection_url()).json(item)).await?;
        Ok(())
    }

    async fn update_item(&self, id: &MenuId, edit: &EditMenuItem) -> MenuResult<()> {
        send(self.request(Method::PUT, self.item_url(id)).json(edit)).await?;
        Ok(())
    }

    async fn move_item(&self, id: &MenuId, body: &MoveMenuItem) -> MenuResult<()> {
        send(self.request(Method::PUT, self.item_url(id)).json(body)).await?;
        Ok(())
    }

    async fn delete_item(&self, id: &MenuId) -> MenuResult<()> {
        send(self.request(Method::DELETE, self.item_url(id))).await?;
        Ok(())
    }
}

/// Send and map non-success statuses to errors
async fn send(builder: RequestBuilder) -> MenuResult<Response> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body).unwrap_or_else(|| MenuError::Status {
        status: status.as_u16(),
        message: error_message(status, &body),
    }))
}

/// Error for a response status; `None` when the request succeeded
fn status_error(status: StatusCode, body: &str) -> Option<MenuError> {
    if status.is_success() {
        return None;
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Some(MenuError::Unauthorized);
    }
    Some(MenuError::Status {
        status: status.as_u16(),
        message: error_message(status, body),
    })
}

/// Best human-readable message from an error response
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.message.or(parsed.error).filter(|m| !m.trim().is_empty()) {
            return msg;
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.chars().take(MAX_ERROR_BODY).collect();
    }
    status.canonical_reason().unwrap_or("unexpected response").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpMenuApi {
        let config = AppConfig {
            api_base_url: base.to_string(),
            ..AppConfig::default()
        };
        HttpMenuApi::new(&config)
    }

    #[test]
    fn test_urls() {
        let api = api("https://example.org/api");
        assert_eq!(api.collection_url(), "https://example.org/api/menu");
        assert_eq!(api.item_url(&MenuId::Num(12)), "https://example.org/api/menu/12");
    }

    #[test]
    fn test_ids_are_escaped_as_one_segment() {
        let api = api("/api");
        assert_eq!(api.item_url(&MenuId::from("parent-child")), "/api/menu/parent-child");
        assert_eq!(api.item_url(&MenuId::from("a/b c")), "/api/menu/a%2Fb%20c");
    }

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message": "Text is required"}"#),
            "Text is required"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error": "Bad parent"}"#),
            "Bad parent"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_error(StatusCode::OK, ""), None);
        assert_eq!(status_error(StatusCode::NO_CONTENT, ""), None);
        assert_eq!(status_error(StatusCode::UNAUTHORIZED, "login first"), Some(MenuError::Unauthorized));
        assert_eq!(status_error(StatusCode::FORBIDDEN, ""), Some(MenuError::Unauthorized));
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, r#"{"message": "Menu item not found"}"#),
            Some(MenuError::Status {
                status: 404,
                message: "Menu item not found".to_string(),
            })
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  upstream down "), "upstream down");
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
        let long = "x".repeat(500);
        assert_eq!(error_message(StatusCode::INTERNAL_SERVER_ERROR, &long).len(), MAX_ERROR_BODY);
    }
}
