// ── WAN reconnect ──
//
// Dropping the PPP session makes the provider hand out a new address on
// redial, usually. In insistent mode we keep dropping until the address
// actually changes or attempts run out.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::router::{Router, TerminationOutcome};
use crate::rpc::RouterRpc;

pub const DEFAULT_ATTEMPTS: u32 = 5;
pub const DEFAULT_ATTEMPT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectOptions {
    /// Keep reconnecting until the external address changes.
    pub insistent: bool,
    pub attempts: u32,
    /// Wait between a termination and the next address check.
    pub attempt_delay: Duration,
}

impl Default for ReconnectOptions {
    fn default() -> Self {
        Self {
            insistent: false,
            attempts: DEFAULT_ATTEMPTS,
            attempt_delay: DEFAULT_ATTEMPT_DELAY,
        }
    }
}

/// Progress notifications, for spinners and the like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectProgress {
    Attempt { attempt: u32, of: u32 },
    Waiting { attempt: u32, delay: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconnectOutcome {
    /// Single termination accepted.
    Terminated,
    /// Single termination; the link was already down.
    AlreadyDown,
    NewIp {
        old: Option<Ipv4Addr>,
        new: Ipv4Addr,
        attempts: u32,
    },
    /// Every attempt ended with the same address.
    Exhausted { ip: Option<Ipv4Addr>, attempts: u32 },
    Cancelled { attempts: u32 },
}

impl ReconnectOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Terminated | Self::AlreadyDown | Self::NewIp { .. }
        )
    }
}

/// Drop the WAN connection, optionally until the address changes.
///
/// While the link redials the router reports no address; that never
/// counts as a change.
pub async fn reconnect<R, F>(
    router: &Router<R>,
    options: &ReconnectOptions,
    cancel: &CancellationToken,
    mut progress: F,
) -> Result<ReconnectOutcome, CoreError>
where
    R: RouterRpc,
    F: FnMut(ReconnectProgress) + Send,
{
    if !options.insistent {
        return Ok(match router.force_termination().await? {
            TerminationOutcome::Terminated => ReconnectOutcome::Terminated,
            TerminationOutcome::AlreadyDown => ReconnectOutcome::AlreadyDown,
        });
    }

    if options.attempts == 0 {
        return Err(CoreError::ValidationFailed {
            message: "reconnect needs at least one attempt".into(),
        });
    }

    let old = router.external_ip().await?;
    debug!(ip = ?old, "external address before reconnect");

    for attempt in 1..=options.attempts {
        progress(ReconnectProgress::Attempt {
            attempt,
            of: options.attempts,
        });
        router.force_termination().await?;

        progress(ReconnectProgress::Waiting {
            attempt,
            delay: options.attempt_delay,
        });
        tokio::select! {
            () = cancel.cancelled() => {
                return Ok(ReconnectOutcome::Cancelled { attempts: attempt });
            }
            () = tokio::time::sleep(options.attempt_delay) => {}
        }

        let current = router.external_ip().await?;
        debug!(attempt, ip = ?current, "external address after termination");
        if let Some(new) = current.filter(|ip| Some(*ip) != old) {
            info!(%new, attempts = attempt, "external address changed");
            return Ok(ReconnectOutcome::NewIp {
                old,
                new,
                attempts: attempt,
            });
        }
    }

    Ok(ReconnectOutcome::Exhausted {
        ip: old,
        attempts: options.attempts,
    })
}
