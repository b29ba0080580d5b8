//! Remote data tier over HTTP
//!
//! A thin JSON GET client: the query point travels as `lat`/`lon` query
//! parameters and the response body deserializes straight into the payload
//! type. Upstream wire formats beyond that are the endpoint's concern.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::geo::GeoPoint;
use crate::domain::{DataProvider, DomainError, ProviderId};

/// Configuration for an HTTP data tier.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Provider name used in errors and telemetry.
    pub name: String,
    /// Endpoint queried with `?lat=..&lon=..`.
    pub base_url: String,
    pub user_agent: String,
}

impl HttpProviderConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            user_agent: concat!("wildfire-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// JSON-over-HTTP provider for any deserializable payload.
#[derive(Debug)]
pub struct HttpJsonProvider<T> {
    id: ProviderId,
    base_url: String,
    client: reqwest::Client,
    _payload: PhantomData<fn() -> T>,
}

impl<T> HttpJsonProvider<T> {
    pub fn new(config: HttpProviderConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| DomainError::internal(format!("build HTTP client: {}", e)))?;

        Ok(Self {
            id: ProviderId::new(&config.name),
            base_url: config.base_url,
            client,
            _payload: PhantomData,
        })
    }
}

#[async_trait]
impl<T> DataProvider<T> for HttpJsonProvider<T>
where
    T: DeserializeOwned + Send + Sync + Debug + 'static,
{
    fn id(&self) -> ProviderId {
        self.id.clone()
    }

    async fn fetch(&self, point: GeoPoint, timeout: Duration) -> Result<T, DomainError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("lat", point.lat()), ("lon", point.lon())])
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::timeout(self.id.as_str())
                } else {
                    DomainError::provider(self.id.as_str(), format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::provider(
                self.id.as_str(),
                format!("HTTP {}", status),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::timeout(self.id.as_str())
            } else {
                DomainError::provider(self.id.as_str(), format!("malformed response: {}", e))
            }
        })
    }
}
