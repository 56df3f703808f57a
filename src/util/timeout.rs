//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::ConvertError;

/// Wrap a future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, ConvertError>>,
) -> Result<T, ConvertError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(ConvertError::Timeout(duration.as_millis() as u64)),
    }
}

/// Run `future` under `duration` when one is given, unbounded otherwise.
pub async fn maybe_with_timeout<T>(
    duration: Option<Duration>,
    future: impl Future<Output = Result<T, ConvertError>>,
) -> Result<T, ConvertError> {
    match duration {
        Some(duration) => with_timeout(duration, future).await,
        None => future.await,
    }
}
