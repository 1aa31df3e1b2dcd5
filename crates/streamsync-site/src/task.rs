//! Cancellable fetches with retry and exponential backoff.
//!
//! A [`FetchTask`] runs its attempts on a spawned task. Dropping the handle
//! signals shutdown and aborts the task, so no attempt is started and no
//! backoff timer fires after the view that owned it is gone.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::ClientError;

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each one after.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Backoff before retry number `retry` (1-based): base, 2×base, 4×base…
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

/// Handle to an in-flight fetch.
pub struct FetchTask<T> {
    handle: Option<JoinHandle<Result<T, ClientError>>>,
    shutdown_tx: watch::Sender<bool>,
}

impl<T: Send + 'static> FetchTask<T> {
    /// Start fetching. `fetch` is called once per attempt.
    pub fn spawn<F, Fut>(policy: RetryPolicy, mut fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut retry = 0;
            loop {
                let result = tokio::select! {
                    _ = shutdown_rx.changed() => return Err(ClientError::Cancelled),
                    result = fetch() => result,
                };
                let err = match result {
                    Ok(value) => return Ok(value),
                    Err(e) => e,
                };
                if retry >= policy.max_retries {
                    return Err(err);
                }
                retry += 1;
                let delay = policy.delay_for(retry);
                debug!(error = %err, retry, ?delay, "fetch failed, retrying");
                tokio::select! {
                    _ = shutdown_rx.changed() => return Err(ClientError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        });

        Self {
            handle: Some(handle),
            shutdown_tx,
        }
    }

    /// Wait for the final outcome: the first success or the last failure.
    pub async fn join(mut self) -> Result<T, ClientError> {
        let Some(handle) = self.handle.take() else {
            return Err(ClientError::Cancelled);
        };
        match handle.await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Cancelled),
        }
    }

    /// Stop the fetch without waiting for it.
    pub fn cancel(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for FetchTask<T> {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
