//! Condition polling against page-side state.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Tick between condition probes. Each probe is itself an async round trip
/// into the page, so the effective period is interval plus probe latency.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Resolves once `poll` first yields `Ok(true)`.
///
/// Carries no deadline of its own; the caller's outer deadline bounds the
/// total wait by dropping this future, which also abandons any in-flight
/// probe so a closed page is never polled again.
pub async fn wait_until<F, Fut>(interval: Duration, mut poll: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    loop {
        if poll().await? {
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn resolves_only_after_condition_holds() {
        let probes = AtomicUsize::new(0);

        wait_until(POLL_INTERVAL, || {
            let count = probes.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(count >= 4) }
        })
        .await
        .expect("poll should resolve");

        // Resolved on the fourth probe, never probed again.
        assert_eq!(probes.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_immediately_when_condition_already_holds() {
        let probes = AtomicUsize::new(0);

        wait_until(POLL_INTERVAL, || {
            probes.fetch_add(1, Ordering::SeqCst);
            async { Ok(true) }
        })
        .await
        .expect("poll should resolve");

        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn propagates_probe_failure() {
        let result = wait_until(POLL_INTERVAL, || async {
            Err(AuditError::Eval("page went away".into()))
        })
        .await;

        assert!(matches!(result, Err(AuditError::Eval(_))));
    }
}
