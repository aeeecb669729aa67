use gloo_net::http::Request;
use log::debug;

use crate::endpoint::{DEFAULT_BASE_URL, Endpoint};
use crate::error::DirectoryError;
use crate::response::decode_response;

/// Fetches directory listings over HTTP from the browser.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    base_url: String,
}

impl Default for DirectoryClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub async fn fetch(&self, endpoint: &Endpoint) -> Result<Vec<String>, DirectoryError> {
        let url = endpoint.url(&self.base_url);
        debug!("GET {url}");
        let resp = Request::get(&url)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;
        decode_response(endpoint, status, &body)
    }
}
