//! Forecast retrieval
//!
//! [`ForecastClient`] performs the single GET request and decodes the body.
//! [`ForecastFetcher`] runs that request on the worker runtime and hands the
//! outcome to exactly one of two continuations on the [`MainQueue`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use futures::future::{AbortHandle, Abortable};
use reqwest::Client;
use tokio::runtime::Handle;
use tracing::{debug, info, instrument, warn};

use crate::config::ForecastConfig;
use crate::error::FetchError;
use crate::models::Forecast;
use crate::scheduler::MainQueue;
use crate::{CitycastError, Result};

/// HTTP client for the forecast endpoint
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl ForecastClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CitycastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds.into()),
            &config.user_agent,
        )
    }

    /// Request URL for a city; `city` is the only query parameter.
    #[must_use]
    pub fn forecast_url(&self, city_id: &str) -> String {
        format!("{}?city={}", self.base_url, urlencoding::encode(city_id))
    }

    /// Fetch and decode the forecast for `city_id`. One request, no retries.
    #[instrument(skip(self))]
    pub async fn fetch(&self, city_id: &str) -> std::result::Result<Forecast, FetchError> {
        let url = self.forecast_url(city_id);
        debug!("Forecast request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Forecast request failed: {}", e);
            FetchError::transport(format!("request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Forecast service answered with status {}", status);
            return Err(FetchError::transport(format!("unexpected status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(format!("failed to read body: {e}")))?;

        if body.is_empty() {
            warn!("Forecast response body is empty");
            return Err(FetchError::EmptyPayload);
        }

        let forecast: Forecast = serde_json::from_slice(&body).map_err(|e| {
            warn!("Failed to decode forecast response: {}", e);
            FetchError::decode(e.to_string())
        })?;

        info!(
            "Retrieved forecast '{}' in {:.3}s",
            forecast.title,
            start_time.elapsed().as_secs_f64()
        );
        Ok(forecast)
    }
}

/// Handle to a fetch started by [`ForecastFetcher::fetch_forecast`]
///
/// Dropping the handle leaves the fetch running.
#[derive(Debug, Clone)]
pub struct FetchHandle {
    cancelled: Arc<AtomicBool>,
    abort: AbortHandle,
}

impl FetchHandle {
    /// Drop interest in the result.
    ///
    /// The in-flight request is aborted if it has not finished yet. When
    /// called on the foreground thread, no continuation runs afterwards.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.abort.abort();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Callback front end over [`ForecastClient`]
#[derive(Clone)]
pub struct ForecastFetcher {
    client: Arc<ForecastClient>,
    runtime: Handle,
    main_queue: MainQueue,
}

impl ForecastFetcher {
    /// Requests run on `runtime`; continuations run on `main_queue`.
    pub fn new(client: ForecastClient, runtime: Handle, main_queue: MainQueue) -> Self {
        Self {
            client: Arc::new(client),
            runtime,
            main_queue,
        }
    }

    /// Start fetching the forecast for `city_id` without blocking.
    ///
    /// Exactly one of `on_success` and `on_failure` is later invoked on the
    /// main queue, unless the returned handle is cancelled first.
    pub fn fetch_forecast<S, F>(
        &self,
        city_id: impl Into<String>,
        on_success: S,
        on_failure: F,
    ) -> FetchHandle
    where
        S: FnOnce(Forecast) + Send + 'static,
        F: FnOnce(FetchError) + Send + 'static,
    {
        let city_id = city_id.into();
        let (abort, registration) = AbortHandle::new_pair();
        let cancelled = Arc::new(AtomicBool::new(false));

        let client = Arc::clone(&self.client);
        let main_queue = self.main_queue.clone();
        let flag = Arc::clone(&cancelled);

        let work = async move {
            let outcome = client.fetch(&city_id).await;
            main_queue.dispatch(move || {
                if flag.load(Ordering::Acquire) {
                    debug!(city_id = %city_id, "Fetch cancelled, dropping result");
                    return;
                }
                match outcome {
                    Ok(forecast) => on_success(forecast),
                    Err(err) => on_failure(err),
                }
            });
        };

        self.runtime.spawn(Abortable::new(work, registration));
        FetchHandle { cancelled, abort }
    }
}
