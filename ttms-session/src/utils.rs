//! Runtime helpers that differ between native and `wasm32` targets.
use std::future::Future;
use std::time::Duration;

/// Returned by [`timeout`] when the deadline elapses first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed;

/// Run `future` to completion unless `duration` elapses first.
#[cfg(not(target_arch = "wasm32"))]
pub async fn timeout<F>(duration: Duration, future: F) -> Result<F::Output, Elapsed>
where
    F: Future,
{
    tokio::time::timeout(duration, future).await.map_err(|_| Elapsed)
}

/// Run `future` to completion unless `duration` elapses first.
#[cfg(target_arch = "wasm32")]
pub async fn timeout<F>(duration: Duration, future: F) -> Result<F::Output, Elapsed>
where
    F: Future,
{
    use futures::future::{select, Either};

    let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
    let sleep = gloo_timers::future::TimeoutFuture::new(millis);
    match select(std::pin::pin!(future), sleep).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(_) => Err(Elapsed),
    }
}
