use std::future::Future;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chat_provider::{CancelSignal, ClassifiedError};

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

pub fn is_cancelled(cancel: Option<&CancelSignal>) -> bool {
    cancel.is_some_and(|token| token.load(Ordering::Acquire))
}

/// Drive `future` to completion unless the cancellation flag is set first.
///
/// The flag is polled every 25ms while the future is pending. Cancellation
/// drops the future and yields an `Aborted` error.
pub async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancelSignal>,
) -> Result<F::Output, ClassifiedError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = Box::pin(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(ClassifiedError::aborted());
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(ClassifiedError::aborted());
            }
            return Ok(output);
        }
    }
}
