//! WAN command handlers: external address and reconnect.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use fritzly_core::reconnect::reconnect as reconnect_wan;
use fritzly_core::{ReconnectOptions, ReconnectOutcome, ReconnectProgress, Router, RouterRpc};

use crate::cli::{GlobalOpts, ReconnectArgs};
use crate::commands::util::ctrl_c_token;
use crate::error::CliError;
use crate::output;

pub async fn myip<R: RouterRpc>(router: &Router<R>, global: &GlobalOpts) -> Result<(), CliError> {
    let ip = router.external_ip().await?.ok_or(CliError::NoExternalIp)?;
    let out = output::render_single(global.output, &ip, ToString::to_string, ToString::to_string)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn reconnect<R: RouterRpc>(
    router: &Router<R>,
    args: ReconnectArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let options = ReconnectOptions {
        insistent: args.newip,
        attempts: args.attempts,
        attempt_delay: Duration::from_secs(args.delay),
    };

    let spinner = if global.quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    };
    spinner.set_message("reconnecting");

    let cancel = ctrl_c_token();
    let progress = spinner.clone();
    let outcome = reconnect_wan(router, &options, &cancel, move |p| match p {
        ReconnectProgress::Attempt { attempt, of } => {
            progress.set_message(format!("reconnect attempt {attempt} of {of}"));
        }
        ReconnectProgress::Waiting { attempt, delay } => {
            progress.set_message(format!(
                "attempt {attempt}: waiting {}s for the link",
                delay.as_secs()
            ));
        }
    })
    .await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    let out = output::render_single(global.output, &outcome, describe, describe)?;
    match outcome {
        ReconnectOutcome::Exhausted { ip, attempts } => Err(CliError::ReconnectExhausted {
            ip: ip.map_or_else(|| "offline".to_owned(), |ip| ip.to_string()),
            attempts,
        }),
        _ => {
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn describe(outcome: &ReconnectOutcome) -> String {
    match outcome {
        ReconnectOutcome::Terminated => "reconnecting".into(),
        ReconnectOutcome::AlreadyDown => "connection already down, reconnecting".into(),
        ReconnectOutcome::NewIp { new, .. } => format!("new IP: {new}"),
        ReconnectOutcome::Exhausted { .. } => "could not get a new IP".into(),
        ReconnectOutcome::Cancelled { attempts } => {
            format!("interrupted after {attempts} attempt(s)")
        }
    }
}
