mod batch;
mod route;

pub use batch::*;
pub use route::*;

use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Run CPU-bound routing work off the async runtime under a deadline.
///
/// The search itself cannot be cancelled; on timeout the blocking task is
/// detached and its result discarded.
pub async fn run_blocking<T, F>(timeout_ms: u64, work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(work);
    match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
        Ok(joined) => joined.context("Routing task failed"),
        Err(_) => {
            tracing::warn!("Routing did not finish within {} ms", timeout_ms);
            bail!("Routing did not finish within {} ms", timeout_ms)
        }
    }
}
