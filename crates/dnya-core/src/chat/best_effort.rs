//! Timeout-and-log policy for auxiliary calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Runs auxiliary operations whose failure must never fail a turn.
///
/// Each call is bounded by `timeout`. Errors and expiry are logged at
/// `warn` and reported to the caller as `None`.
#[derive(Debug, Clone, Copy)]
pub struct BestEffort {
    pub timeout: Duration,
}

impl BestEffort {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn run<T, E, F>(&self, label: &str, fut: F) -> Option<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!(operation = label, error = %e, "best-effort call failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    operation = label,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "best-effort call timed out"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_success_through() {
        let policy = BestEffort::new(Duration::from_secs(1));
        let value = policy.run("ok", async { Ok::<_, String>(7) }).await;
        assert_eq!(value, Some(7));
    }

    #[tokio::test]
    async fn test_run_absorbs_errors() {
        let policy = BestEffort::new(Duration::from_secs(1));
        let value: Option<u32> = policy
            .run("err", async { Err::<u32, _>("index offline".to_string()) })
            .await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_run_absorbs_timeouts() {
        let policy = BestEffort::new(Duration::from_millis(20));
        let value = policy
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, String>(1)
            })
            .await;
        assert!(value.is_none());
    }
}
