use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

use crate::error::DatabaseError;

/// PostgREST handle. Built once at start-up and shared by every service.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match (
            HeaderValue::from_str(&self.service_key),
            HeaderValue::from_str(&format!("Bearer {}", self.service_key)),
        ) {
            (Ok(api_key), Ok(bearer)) => {
                headers.insert("apikey", api_key);
                headers.insert(AUTHORIZATION, bearer);
            }
            _ => warn!("Service key contains characters not allowed in headers; sending unauthenticated request"),
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, DatabaseError>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, DatabaseError>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers();
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);
            return Err(DatabaseError::from_status(status, error_text));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    fn representation() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }

    /// `GET /rest/v1/{table}?{query}`
    pub async fn select<T>(&self, table: &str, query: &str) -> Result<Vec<T>, DatabaseError>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?{}", table, query);
        self.request(Method::GET, &path, None).await
    }

    /// Inserts one row and returns it as stored.
    pub async fn insert<T>(&self, table: &str, row: Value) -> Result<T, DatabaseError>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}", table);
        let mut rows: Vec<T> = self.request_with_headers(
            Method::POST,
            &path,
            Some(row),
            Some(Self::representation()),
        ).await?;

        if rows.is_empty() {
            return Err(DatabaseError::Api {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Insert into {} returned no rows", table),
            });
        }

        Ok(rows.swap_remove(0))
    }

    /// Patches every row matching `filter` and returns the updated rows.
    pub async fn update<T>(&self, table: &str, filter: &str, changes: Value) -> Result<Vec<T>, DatabaseError>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?{}", table, filter);
        self.request_with_headers(
            Method::PATCH,
            &path,
            Some(changes),
            Some(Self::representation()),
        ).await
    }

    /// Deletes every row matching `filter` and returns the removed rows.
    pub async fn delete<T>(&self, table: &str, filter: &str) -> Result<Vec<T>, DatabaseError>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?{}", table, filter);
        self.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(Self::representation()),
        ).await
    }
}
