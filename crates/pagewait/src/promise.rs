//! Awaitables returned by the wait engine.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use crate::result::WaitResult;

/// Pending result of a wait.
///
/// Lazy like any future: the engine starts evaluating, and its clock starts
/// running, on the first poll.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct WaitPromise<V> {
    inner: BoxFuture<'static, WaitResult<V>>,
}

impl<V> WaitPromise<V> {
    pub(crate) fn new<F>(future: F) -> Self
    where
        F: Future<Output = WaitResult<V>> + Send + 'static,
    {
        Self {
            inner: future.boxed(),
        }
    }
}

impl<V> Future for WaitPromise<V> {
    type Output = WaitResult<V>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<V> std::fmt::Debug for WaitPromise<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitPromise").finish_non_exhaustive()
    }
}

/// Pending element produced by waiting on an [`crate::ElementCondition`].
///
/// Awaits to the element itself, and lets callers chain follow-up actions
/// on that element.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ElementPromise<E> {
    inner: BoxFuture<'static, WaitResult<E>>,
}

impl<E: Send + 'static> ElementPromise<E> {
    pub(crate) fn new<F>(future: F) -> Self
    where
        F: Future<Output = WaitResult<E>> + Send + 'static,
    {
        Self {
            inner: future.boxed(),
        }
    }

    /// Transform the element once it resolves
    pub fn map<R, F>(self, func: F) -> WaitPromise<R>
    where
        F: FnOnce(E) -> R + Send + 'static,
        R: Send + 'static,
    {
        WaitPromise::new(self.inner.map(|result| result.map(func)))
    }

    /// Run an asynchronous action against the element once it resolves.
    /// Failures of the wait skip the action.
    pub fn and_then<R, F, Fut>(self, action: F) -> WaitPromise<R>
    where
        F: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = WaitResult<R>> + Send + 'static,
        R: Send + 'static,
    {
        WaitPromise::new(async move { action(self.inner.await?).await })
    }
}

impl<E> Future for ElementPromise<E> {
    type Output = WaitResult<E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<E> std::fmt::Debug for ElementPromise<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementPromise").finish_non_exhaustive()
    }
}

/// Completes after `duration` without blocking the thread
pub async fn delayed(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::result::WaitError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_wait_promise_delegates() {
        let promise = WaitPromise::new(async { Ok(7) });
        assert_eq!(promise.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_element_promise_map() {
        let promise = ElementPromise::new(async { Ok("button".to_string()) });
        let len = promise.map(|el| el.len()).await.unwrap();
        assert_eq!(len, 6);
    }

    #[tokio::test]
    async fn test_element_promise_and_then_skips_on_error() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let promise: ElementPromise<u8> =
            ElementPromise::new(async { Err(WaitError::webdriver("gone")) });
        let result = promise
            .and_then(move |_| async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert_eq!(result.unwrap_err().to_string(), "gone");
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_element_promise_and_then_runs_action() {
        let promise = ElementPromise::new(async { Ok(2_u32) });
        let result = promise.and_then(|el| async move { Ok(el * 10) }).await;
        assert_eq!(result.unwrap(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed() {
        let start = Instant::now();
        delayed(Duration::from_millis(250)).await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
