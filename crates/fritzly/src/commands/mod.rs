//! Command dispatch: bridges CLI args -> router actions -> output formatting.

pub mod config_cmd;
pub mod log;
pub mod port;
pub mod speedmeter;
pub mod util;
pub mod wan;
pub mod wlan;

use fritzly_core::{Router, RouterRpc};

use crate::cli::{Command, GlobalOpts, WlanCommand};
use crate::error::CliError;

/// Reject arguments that can be judged without talking to the router.
pub fn validate(cmd: &Command) -> Result<(), CliError> {
    match cmd {
        Command::Wlan(args) => match &args.command {
            WlanCommand::Qr { name } => wlan::resolve_single(name).map(|_| ()),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch<R: RouterRpc>(
    cmd: Command,
    router: &Router<R>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Port(args) => port::handle(router, args, global).await,
        Command::Wlan(args) => wlan::handle(router, args, global).await,
        Command::Myip => wan::myip(router, global).await,
        Command::Reconnect(args) => wan::reconnect(router, args, global).await,
        Command::Speedmeter(args) => speedmeter::handle(router, args, global).await,
        Command::Log(args) => log::handle(router, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
