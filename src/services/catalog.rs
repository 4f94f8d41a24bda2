// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Book catalog client (Google Books `volumes` API).
//!
//! Supplies the volume records that books and swaps are created from.

use crate::config::Config;
use crate::error::AppError;
use crate::models::Volume;
use serde::Deserialize;
use std::time::Duration;

/// The catalog API caps a page at 40 volumes.
pub const MAX_SEARCH_RESULTS: u32 = 40;
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeSearchResponse {
    #[serde(default)]
    total_items: u32,
    #[serde(default)]
    items: Vec<Volume>,
}

/// Book catalog API client.
#[derive(Clone)]
pub struct CatalogService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CatalogService {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default catalog HTTP client");
                reqwest::Client::new()
            });

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.books_api_url, config.books_api_key.clone())
    }

    /// Free-text volume search.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Volume>, AppError> {
        let url = format!("{}/volumes", self.base_url);
        let max_results = max_results.clamp(1, MAX_SEARCH_RESULTS);

        let mut params = vec![
            ("q", query.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Catalog(e.to_string()))?;

        let body: VolumeSearchResponse = self.check_response_json(response).await?;
        tracing::debug!(
            query,
            total_items = body.total_items,
            returned = body.items.len(),
            "Catalog search"
        );
        Ok(body.items)
    }

    /// Fetch a single volume by its catalog ID.
    pub async fn get_volume(&self, volume_id: &str) -> Result<Volume, AppError> {
        let url = format!(
            "{}/volumes/{}",
            self.base_url,
            urlencoding::encode(volume_id)
        );

        let mut request = self.http.get(&url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Catalog(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(AppError::NotFound("Catalog volume not found".to_string()));
            }
            if status.as_u16() == 429 {
                tracing::warn!("Book catalog rate limit hit (429)");
            }

            return Err(AppError::Catalog(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Catalog(format!("Invalid catalog response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use std::collections::HashMap;

    async fn spawn_catalog_stub() -> String {
        async fn search(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "kind": "books#volumes",
                "totalItems": 1,
                "items": [{
                    "id": "vol-1",
                    "volumeInfo": {
                        "title": params.get("q").cloned().unwrap_or_default(),
                        "description": params.get("maxResults").cloned().unwrap_or_default()
                    }
                }]
            }))
        }

        let app = Router::new()
            .route("/books/v1/volumes", get(search))
            .route(
                "/books/v1/volumes/{id}",
                get(|| async { (axum::http::StatusCode::NOT_FOUND, "missing") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/books/v1/", addr)
    }

    #[tokio::test]
    async fn test_search_clamps_max_results() {
        let base = spawn_catalog_stub().await;
        let catalog = CatalogService::new(&base, None);

        let volumes = catalog.search("dune", 500).await.unwrap();

        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].volume_info.title.as_deref(), Some("dune"));
        assert_eq!(volumes[0].volume_info.description.as_deref(), Some("40"));
    }

    #[tokio::test]
    async fn test_missing_volume_is_not_found() {
        let base = spawn_catalog_stub().await;
        let catalog = CatalogService::new(&base, None);

        let err = catalog.get_volume("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
