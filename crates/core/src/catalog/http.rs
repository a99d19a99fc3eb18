//! Request helpers shared by the catalog clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::CatalogError;

/// Build a catalog HTTP client.
pub(super) fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client, CatalogError> {
    Ok(Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Send a request and decode a JSON body, mapping HTTP statuses to
/// [`CatalogError`] variants. `what` names the resource for error messages.
pub(super) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> Result<T, CatalogError> {
    let response = request.send().await?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("Catalog rate limit exceeded while fetching {}", what);
        return Err(CatalogError::RateLimited);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound(what.to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| CatalogError::Parse(format!("{}: {}", what, e)))
}
