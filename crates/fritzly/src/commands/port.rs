//! Port forward command handlers.

use fritzly_core::model::ANY_REMOTE_HOST;
use fritzly_core::{PortMapping, Protocol, Router, RouterRpc, SystemHost};

use crate::cli::{GlobalOpts, PortArgs, PortCommand, PortTarget};
use crate::commands::util::check_mark;
use crate::error::CliError;
use crate::output;
use crate::table::{Align, Table};

pub async fn handle<R: RouterRpc>(
    router: &Router<R>,
    args: PortArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PortCommand::Open(target) => {
            let mapping = router
                .open_port(&SystemHost, target.port, protocol(&target), target.name.as_deref())
                .await?;
            print_mapping(&mapping, global)
        }
        PortCommand::Close(target) => {
            let mapping = router
                .close_port(&SystemHost, target.port, protocol(&target), target.name.as_deref())
                .await?;
            print_mapping(&mapping, global)
        }
        PortCommand::List => {
            let mappings = router.port_mappings().await?;
            if mappings.is_empty() && global.output == crate::cli::OutputFormat::Table {
                output::print_output("no port mappings found", global.quiet);
                return Ok(());
            }
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &mappings,
                |m| mapping_table(m, color),
                |m| m.description.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn protocol(target: &PortTarget) -> Protocol {
    if target.udp { Protocol::Udp } else { Protocol::Tcp }
}

fn print_mapping(mapping: &PortMapping, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        mapping,
        |m| mapping_table(std::slice::from_ref(m), color),
        |m| m.description.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn mapping_table(mappings: &[PortMapping], color: bool) -> String {
    Table::new(["ACTIVE", "DESCRIPTION", "PROTOCOL", "FROM", "TO"])
        .align([
            Align::Center,
            Align::Left,
            Align::Left,
            Align::Left,
            Align::Left,
        ])
        .header_style(color)
        .rows(mappings.iter().map(|m| {
            [
                check_mark(m.enabled),
                m.description.clone(),
                m.protocol.to_string(),
                format!("{}:{}", remote_host(m), m.external_port),
                format!("{}:{}", m.internal_client, m.internal_port),
            ]
        }))
        .render()
}

fn remote_host(mapping: &PortMapping) -> &str {
    if mapping.remote_host.is_empty() {
        ANY_REMOTE_HOST
    } else {
        &mapping.remote_host
    }
}
