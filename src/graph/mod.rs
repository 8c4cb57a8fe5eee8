pub mod auth;

use crate::error::{Result, Rpt365Error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";
pub const GRAPH_API_BETA: &str = "https://graph.microsoft.com/beta";

/// Graph API client
///
/// Holds one authenticated `reqwest` client for the lifetime of the run.
/// The v1.0 and beta surfaces are addressed per call (`get` vs `get_beta`)
/// rather than by mutating a client-wide API version.
pub struct GraphClient {
    client: Client,
    access_token: String,
    base_url: String,
    beta_url: String,
}

impl GraphClient {
    pub fn new(access_token: String) -> Self {
        Self::with_endpoints(access_token, GRAPH_API_BASE.into(), GRAPH_API_BETA.into())
    }

    /// Build a client against explicit endpoints (used by tests)
    pub fn with_endpoints(access_token: String, base_url: String, beta_url: String) -> Self {
        Self {
            client: Client::new(),
            access_token,
            base_url,
            beta_url,
        }
    }

    /// Make a GET request to the Graph v1.0 surface
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        self.get_url(&url).await
    }

    /// Make a GET request to the Graph beta surface
    pub async fn get_beta<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}", self.beta_url, endpoint.trim_start_matches('/'));
        self.get_url(&url).await
    }

    /// Make a POST request to the Graph v1.0 surface
    ///
    /// Returns `()` for 202/204 responses with empty bodies (e.g. sendMail).
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<()> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        tracing::debug!(%url, "graph POST");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            let enhanced_error = crate::error::enhance_graph_error(&error_text);
            return Err(Rpt365Error::GraphApiError(format!(
                "HTTP {}: {}",
                status, enhanced_error
            )));
        }

        Ok(())
    }

    /// GET an absolute URL (used for following `@odata.nextLink`)
    async fn get_url<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        tracing::debug!(%url, "graph GET");

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            let enhanced_error = crate::error::enhance_graph_error(&error_text);
            return Err(Rpt365Error::GraphApiError(format!(
                "HTTP {}: {}",
                status, enhanced_error
            )));
        }

        let data = resp.json::<T>().await?;
        Ok(data)
    }
}

// ============================================================================
// Pagination Helpers
// ============================================================================

/// Generic paginated response from Graph API
///
/// Standard OData collection shape with a `value` array and `@odata.nextLink`.
#[derive(Debug, Deserialize)]
pub struct PaginatedResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Lazy cursor over a paginated Graph collection
///
/// Each `next_page` call fetches exactly one page; `None` marks the end of
/// the collection. Callers that only aggregate (e.g. counting messages) can
/// walk the collection without buffering it.
pub struct PageCursor<'a, T> {
    client: &'a GraphClient,
    next_url: Option<String>,
    _items: PhantomData<T>,
}

impl<'a, T: for<'de> Deserialize<'de>> PageCursor<'a, T> {
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        let url = match self.next_url.take() {
            Some(url) => url,
            None => return Ok(None),
        };

        let page: PaginatedResponse<T> = self.client.get_url(&url).await?;
        self.next_url = page.next_link;
        Ok(Some(page.value))
    }
}

impl GraphClient {
    /// Start a lazy page walk over a v1.0 collection endpoint
    pub fn pages<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> PageCursor<'_, T> {
        PageCursor {
            client: self,
            next_url: Some(format!(
                "{}/{}",
                self.base_url,
                endpoint.trim_start_matches('/')
            )),
            _items: PhantomData,
        }
    }

    /// Start a lazy page walk over a beta collection endpoint
    pub fn pages_beta<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> PageCursor<'_, T> {
        PageCursor {
            client: self,
            next_url: Some(format!(
                "{}/{}",
                self.beta_url,
                endpoint.trim_start_matches('/')
            )),
            _items: PhantomData,
        }
    }

    /// Fetch all pages of a paginated v1.0 endpoint
    ///
    /// Follows `@odata.nextLink` until the collection is exhausted.
    pub async fn get_all_pages<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
    ) -> Result<Vec<T>> {
        Self::drain(self.pages(endpoint)).await
    }

    /// Fetch all pages of a paginated beta endpoint
    pub async fn get_all_pages_beta<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
    ) -> Result<Vec<T>> {
        Self::drain(self.pages_beta(endpoint)).await
    }

    async fn drain<T: for<'de> Deserialize<'de>>(mut cursor: PageCursor<'_, T>) -> Result<Vec<T>> {
        let mut all_items: Vec<T> = Vec::new();

        while let Some(page) = cursor.next_page().await? {
            all_items.extend(page);
        }

        Ok(all_items)
    }
}
