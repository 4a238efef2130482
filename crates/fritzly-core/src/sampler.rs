// ── Online monitor sampling loop ──

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::CoreError;
use crate::model::OnlineMonitorSample;
use crate::router::Router;
use crate::rpc::RouterRpc;

/// The router refreshes its online monitor about once a second.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Read the online monitor every `interval` and hand each sample to `on_sample`.
///
/// Runs once when `once` is set, otherwise until `cancel` fires or a call
/// fails. Returns the number of samples delivered.
pub async fn sample_online_monitor<R, F>(
    router: &Router<R>,
    interval: Duration,
    once: bool,
    cancel: &CancellationToken,
    mut on_sample: F,
) -> Result<u64, CoreError>
where
    R: RouterRpc,
    F: FnMut(&OnlineMonitorSample) + Send,
{
    let mut delivered = 0_u64;
    loop {
        let sample = router.online_monitor().await?;
        on_sample(&sample);
        delivered += 1;
        trace!(delivered, "online monitor sample");

        if once {
            return Ok(delivered);
        }

        tokio::select! {
            () = cancel.cancelled() => return Ok(delivered),
            () = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::router::services;
    use crate::testing::FakeRpc;

    fn monitor() -> FakeRpc {
        FakeRpc::new().ok(
            services::WAN_COMMON,
            "X_AVM-DE_GetOnlineMonitor",
            &[
                ("Newmax_us", "1000"),
                ("Newmax_ds", "10000"),
                ("Newus_current_bps", "500"),
                ("Newds_current_bps", "2500"),
            ],
        )
    }

    #[tokio::test]
    async fn once_takes_a_single_sample() {
        let router = Router::new(monitor());
        let delivered = sample_online_monitor(
            &router,
            SAMPLE_INTERVAL,
            true,
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(delivered, 1);
        assert_eq!(
            router
                .rpc()
                .count(services::WAN_COMMON, "X_AVM-DE_GetOnlineMonitor"),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn one_call_per_tick_until_cancelled() {
        let router = Router::new(monitor());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let start = tokio::time::Instant::now();
        let mut seen = 0;

        let delivered = sample_online_monitor(&router, SAMPLE_INTERVAL, false, &cancel, |s| {
            assert_eq!(s.current_downstream(), 2500);
            seen += 1;
            if seen == 3 {
                trigger.cancel();
            }
        })
        .await
        .unwrap();

        assert_eq!(delivered, 3);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert_eq!(
            router
                .rpc()
                .count(services::WAN_COMMON, "X_AVM-DE_GetOnlineMonitor"),
            3
        );
    }

    #[tokio::test]
    async fn failing_call_ends_the_loop() {
        let router = Router::new(FakeRpc::new());
        let err = sample_online_monitor(
            &router,
            SAMPLE_INTERVAL,
            false,
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::ServiceUnavailable { .. }));
    }
}
