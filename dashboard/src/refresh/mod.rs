//! # refresh — background tasks that produce DisplayState
//!
//! Both variants run as one tokio task publishing whole states over a
//! `watch` channel:
//!
//! * [`poll`]   — ticker + sampled real fetches against the proxy
//! * [`stream`] — Binance ticker with reconnect-forever supervision
//!
//! [`RefreshTask`] owns the task.  Stopping or dropping it signals shutdown,
//! which also cancels any pending reconnect delay.

pub mod poll;
pub mod stream;

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct RefreshTask {
    shutdown: watch::Sender<bool>,
    handle:   Option<JoinHandle<()>>,
}

impl RefreshTask {
    /// Spawn `body` with a shutdown receiver it must honour.
    pub fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(body(rx));
        Self { shutdown, handle: Some(handle) }
    }

    /// Signal shutdown and wait for the task to wind down.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                debug!(error = %e, "Refresh task ended abnormally");
            }
        }
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Resolves once shutdown is signalled (or the sender is gone).
pub async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_stop_waits_for_body_to_observe_shutdown() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let task = RefreshTask::spawn(move |mut shutdown| async move {
            cancelled(&mut shutdown).await;
            flag.store(true, Ordering::SeqCst);
        });
        task.stop().await;

        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_drop_aborts_task() {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);

        let task = RefreshTask::spawn(move |_shutdown| async move {
            let _keep = tx;
            std::future::pending::<()>().await;
        });
        drop(task);

        // The sender inside the aborted task is dropped with it.
        assert!(rx.recv().await.is_none());
    }
}
