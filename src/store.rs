//! Document-store contract: the REST endpoints the canvas reads and writes.
//!
//! Only two calls matter to the engine: `GET /whiteboards/:id` to hydrate a
//! session and `PUT /whiteboards/:id/content` to autosave. Listing, creating,
//! joining and archiving boards belong to the surrounding portal.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::doc::Element;
use crate::error::CanvasError;

/// A whiteboard document as returned by `GET /whiteboards/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct WhiteboardDoc {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub session_code: String,
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Open-ended canvas state; see [`CanvasConfig`].
    #[serde(default)]
    pub canvas_state: serde_json::Value,
}

impl WhiteboardDoc {
    /// Typed canvas configuration, falling back to defaults if the stored
    /// state does not parse.
    #[must_use]
    pub fn config(&self) -> CanvasConfig {
        CanvasConfig::from_canvas_state(&self.canvas_state).unwrap_or_else(|err| {
            tracing::warn!(whiteboard_id = %self.id, %err, "invalid canvas_state, using defaults");
            CanvasConfig::default()
        })
    }
}

/// Body of `PUT /whiteboards/:id/content`.
#[derive(Debug, Serialize)]
pub struct ContentUpdate<'a> {
    pub elements: &'a [Element],
}

/// HTTP client for the whiteboard document endpoints.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DocumentClient {
    /// Create a client for the API rooted at `base_url` (trailing `/` ignored).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http: reqwest::Client::new(), base_url, token: None }
    }

    /// Attach a bearer token to every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn whiteboard_url(&self, whiteboard_id: &str) -> String {
        format!("{}/whiteboards/{whiteboard_id}", self.base_url)
    }

    #[must_use]
    pub fn content_url(&self, whiteboard_id: &str) -> String {
        format!("{}/whiteboards/{whiteboard_id}/content", self.base_url)
    }

    /// Load a whiteboard document.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::StoreRequest`] on transport or decode failure and
    /// [`CanvasError::StoreStatus`] for non-success responses.
    pub async fn fetch(&self, whiteboard_id: &str) -> Result<WhiteboardDoc, CanvasError> {
        let url = self.whiteboard_url(whiteboard_id);
        let response = self.authorized(self.http.get(&url)).send().await?;
        if !response.status().is_success() {
            return Err(CanvasError::StoreStatus { status: response.status().as_u16(), url });
        }
        Ok(response.json::<WhiteboardDoc>().await?)
    }

    /// Persist the full element list.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentClient::fetch`].
    pub async fn save_content(&self, whiteboard_id: &str, elements: &[Element]) -> Result<(), CanvasError> {
        let url = self.content_url(whiteboard_id);
        let body = ContentUpdate { elements };
        let response = self.authorized(self.http.put(&url)).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(CanvasError::StoreStatus { status: response.status().as_u16(), url });
        }
        Ok(())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
