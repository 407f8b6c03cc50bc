use std::{future::Future, sync::Arc};

use tokio::sync::watch;

use crate::error::{ClientError, ClientResult};

/// Cloneable cancellation signal for in-flight requests.
///
/// A view that is torn down, or that has issued a newer request for the same
/// data, cancels the token so the stale response is never applied.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so `wait_for` can only fail if it is dropped.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Drives `fut` to completion unless the token fires first, in which case
    /// the future is dropped and `ClientError::Cancelled` is returned.
    pub async fn run<T, F>(&self, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        if self.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ClientError::Cancelled),
            result = fut => result,
        }
    }
}
