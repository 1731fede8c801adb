//! HTTP implementations of the client traits.
//!
//! `ShopClient` talks to the shop's REST API with key/secret query
//! auth; `ErpClient` posts JSON to the ERP with a bearer token. Both
//! run every call through the retry policy and rate limiter.

use async_trait::async_trait;
use serde::Deserialize;
use storesync_core::{SyncConfig, SyncError, SyncResult};
use storesync_customers::{DestinationCustomer, SourceCustomer};
use storesync_orders::{DestinationOrder, SourceOrder};

use crate::retry::{RateLimiter, RetryPolicy};
use crate::{DestinationClient, OrderFilter, SourceClient};

/// Shop (source) API client.
pub struct ShopClient {
    http: reqwest::Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
    retry: RetryPolicy,
    limiter: RateLimiter,
}

impl ShopClient {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.source_url.trim_end_matches('/').to_string(),
            consumer_key: config.source_key.clone(),
            consumer_secret: config.source_secret.clone(),
            retry: RetryPolicy::new(&config.retry),
            limiter: RateLimiter::new(&config.rate_limit),
        }
    }

    fn auth_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("consumer_key", self.consumer_key.clone()),
            ("consumer_secret", self.consumer_secret.clone()),
        ]
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> SyncResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        self.retry
            .run(|| async {
                self.limiter.acquire().await;
                let resp = self
                    .http
                    .get(&url)
                    .query(params)
                    .send()
                    .await
                    .map_err(|e| SyncError::remote_fetch(format!("GET {path}: {e}")))?;

                let status = resp.status();
                if !status.is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(SyncError::remote_fetch(format!(
                        "GET {path} returned {status}: {body}"
                    )));
                }

                resp.json::<T>()
                    .await
                    .map_err(|e| SyncError::remote_fetch(format!("decoding {path}: {e}")))
            })
            .await
    }
}

/// Query parameters for an order fetch (status always, `after` only for
/// incremental runs).
pub(crate) fn order_params(filter: &OrderFilter) -> Vec<(&'static str, String)> {
    let mut params = vec![("status", filter.status.clone())];
    if let Some(since) = filter.since {
        params.push(("after", since.to_rfc3339()));
    }
    params
}

#[async_trait]
impl SourceClient for ShopClient {
    async fn fetch_pending(&self, filter: &OrderFilter) -> SyncResult<Vec<SourceOrder>> {
        let mut params = order_params(filter);
        params.extend(self.auth_params());
        let orders: Vec<SourceOrder> = self.get_json("orders", &params).await?;
        tracing::info!(count = orders.len(), status = %filter.status, "fetched pending orders");
        Ok(orders)
    }

    async fn fetch_customers(&self) -> SyncResult<Vec<SourceCustomer>> {
        let params = self.auth_params();
        let customers: Vec<SourceCustomer> = self.get_json("customers", &params).await?;
        tracing::info!(count = customers.len(), "fetched customers");
        Ok(customers)
    }
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: u64,
}

/// ERP (destination) API client.
pub struct ErpClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retry: RetryPolicy,
    limiter: RateLimiter,
}

impl ErpClient {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.destination_url.trim_end_matches('/').to_string(),
            token: config.destination_token.clone(),
            retry: RetryPolicy::new(&config.retry),
            limiter: RateLimiter::new(&config.rate_limit),
        }
    }

    async fn post_json<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> SyncResult<u64> {
        let url = format!("{}/{}", self.base_url, path);
        self.retry
            .run(|| async {
                self.limiter.acquire().await;
                let resp = self
                    .http
                    .post(&url)
                    .bearer_auth(&self.token)
                    .json(body)
                    .send()
                    .await
                    .map_err(|e| SyncError::remote_write(format!("POST {path}: {e}")))?;

                let status = resp.status();
                if !status.is_success() {
                    let text = resp.text().await.unwrap_or_default();
                    return Err(SyncError::remote_write(format!(
                        "POST {path} returned {status}: {text}"
                    )));
                }

                let created: CreatedResponse = resp
                    .json()
                    .await
                    .map_err(|e| SyncError::remote_write(format!("decoding {path}: {e}")))?;
                Ok(created.id)
            })
            .await
    }
}

#[async_trait]
impl DestinationClient for ErpClient {
    async fn create_order(&self, order: &DestinationOrder) -> SyncResult<u64> {
        let id = self.post_json("api/orders", order).await?;
        tracing::debug!(destination_id = id, "order created in destination");
        Ok(id)
    }

    async fn create_customer(&self, customer: &DestinationCustomer) -> SyncResult<u64> {
        let id = self.post_json("api/partners", customer).await?;
        tracing::debug!(destination_id = id, "customer created in destination");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn order_params_omit_after_for_full_fetch() {
        let params = order_params(&OrderFilter::status("processing"));
        assert_eq!(params, vec![("status", "processing".to_string())]);
    }

    #[test]
    fn order_params_include_after_for_incremental_fetch() {
        let since = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let params = order_params(&OrderFilter::status("processing").with_since(since));

        assert_eq!(params[0], ("status", "processing".to_string()));
        assert_eq!(params[1].0, "after");
        assert!(params[1].1.starts_with("2026-08-01T00:00:00"));
    }
}
