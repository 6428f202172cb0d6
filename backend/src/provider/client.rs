use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::ProviderError;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound HTTP client with bounded retry.
///
/// Retries only on responses the provider may recover from: no response at
/// all (connect failure), 5xx, and 429. Client errors are surfaced
/// immediately, and timeouts are not retried since the full budget was
/// already spent waiting. Backoff grows linearly with the attempt number.
#[derive(Clone)]
pub struct RetryingClient {
    inner: reqwest::Client,
}

impl RetryingClient {
    pub fn new() -> Result<Self, ProviderError> {
        let inner = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&'static str, String)],
    ) -> Result<T, ProviderError> {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut request = self.inner.get(url).query(query);
            for (name, value) in headers {
                request = request.header(*name, value);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<T>().await.map_err(|e| {
                            ProviderError::Api(format!("malformed provider response: {e}"))
                        });
                    }

                    let retryable =
                        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
                    if retryable && attempt < MAX_RETRIES {
                        let delay = RETRY_DELAY * attempt;
                        tracing::warn!(
                            "provider returned {status}, retry {attempt}/{MAX_RETRIES} after {delay:?}"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                        ProviderError::RateLimited
                    } else {
                        ProviderError::Network(format!("provider returned HTTP {status}"))
                    });
                }
                Err(err) => {
                    if err.is_connect() && attempt < MAX_RETRIES {
                        let delay = RETRY_DELAY * attempt;
                        tracing::warn!(
                            "provider unreachable ({err}), retry {attempt}/{MAX_RETRIES} after {delay:?}"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(ProviderError::Network(err.to_string()));
                }
            }
        }
    }
}
