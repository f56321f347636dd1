//! HTTP calls with the rate-limit retry policy applied.

use reqwest::{RequestBuilder, Response};
use shopit_core::RetryPolicy;

/// Errors from [`send_with_retry`].
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server kept answering with a retryable status.
    #[error("gave up after status {0}")]
    RetryableStatus(u16),
    /// The request has a streaming body and can't be sent twice.
    #[error("request can't be retried")]
    NotCloneable,
}

/// Sends `request`, retrying while the response status is one the policy
/// considers retryable.
///
/// Other non-success statuses are returned as a normal response. Transport
/// failures are not retried.
pub async fn send_with_retry(
    policy: &RetryPolicy,
    request: RequestBuilder,
) -> Result<Response, HttpError> {
    let is_retryable = |err: &HttpError| {
        matches!(err, HttpError::RetryableStatus(status)
            if policy.is_retryable_status(*status))
    };
    let attempt = move || {
        let request = request.try_clone();
        async move {
            let request = request.ok_or(HttpError::NotCloneable)?;
            let response = request.send().await?;
            let status = response.status().as_u16();
            if policy.is_retryable_status(status) {
                return Err(HttpError::RetryableStatus(status));
            }
            Ok::<_, HttpError>(response)
        }
    };
    policy.run(is_retryable, attempt).await
}
