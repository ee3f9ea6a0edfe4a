use std::future::Future;
use tracing::{debug, warn};

use crate::api_connection::ApiConnectionError;

/// Awaits `remote`; on any error returns `fallback()` instead.
///
/// Every remote assistant operation goes through here so that transport
/// failures, bad statuses, malformed payloads and a disabled assistant all
/// degrade the same way. Errors are logged, never returned.
pub async fn with_fallback<T, Fut, F>(operation: &str, remote: Fut, fallback: F) -> T
where
    Fut: Future<Output = Result<T, ApiConnectionError>>,
    F: FnOnce() -> T,
{
    match remote.await {
        Ok(value) => value,
        Err(ApiConnectionError::Disabled) => {
            debug!(operation, "assistant disabled, using local fallback");
            fallback()
        }
        Err(e) => {
            warn!(operation, error = %e, "assistant call failed, using local fallback");
            fallback()
        }
    }
}
