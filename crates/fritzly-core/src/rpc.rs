// ── RPC seam ──
//
// Everything in core talks to the router through `RouterRpc`, so router
// logic can be exercised against a scripted fake instead of a live box.

use std::future::Future;

use fritzly_api::{ActionResponse, Arguments, Tr064Client};

/// Invoke a named action on a named TR-064 service.
///
/// Implementations return `fritzly_api::Error::UnknownService` when the
/// device lacks the service; callers rely on that to probe optional
/// services such as the third Wi-Fi radio.
pub trait RouterRpc: Sync {
    fn call(
        &self,
        service: &str,
        action: &str,
        args: Arguments,
    ) -> impl Future<Output = Result<ActionResponse, fritzly_api::Error>> + Send;
}

impl RouterRpc for Tr064Client {
    async fn call(
        &self,
        service: &str,
        action: &str,
        args: Arguments,
    ) -> Result<ActionResponse, fritzly_api::Error> {
        Tr064Client::call(self, service, action, &args).await
    }
}
