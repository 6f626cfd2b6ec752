pub mod file;
pub mod nse;

use anyhow::Result;
use async_trait::async_trait;

pub use crate::pipeline::RawSnapshot;
pub use file::FileSource;
pub use nse::NseSource;

/// Where each cycle's snapshot comes from.
///
/// An `Err` from [`fetch`](SnapshotSource::fetch) means the cycle is skipped
/// without touching the sink.
#[async_trait]
pub trait SnapshotSource: Send {
    /// Short label published in the metadata row.
    fn mode_label(&self) -> &str;

    async fn fetch(&mut self) -> Result<RawSnapshot>;
}

/// Retry an async operation with exponential backoff.
pub async fn retry<T, F, Fut>(max_retries: u32, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(val) => return Ok(val),
            Err(e) if attempt >= max_retries => return Err(e),
            Err(e) => {
                tracing::debug!(attempt, error = %format!("{e:#}"), "retrying");
                let delay = std::time::Duration::from_millis(500 * 2u64.pow(attempt));
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let result = retry(3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    anyhow::bail!("attempt {n} failed")
                }
                Ok(n)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry(1, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { anyhow::bail!("down") }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
