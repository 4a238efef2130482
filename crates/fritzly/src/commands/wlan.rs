//! Wi-Fi command handlers.

use fritzly_core::{
    AliasTable, DEFAULT_WLAN_OFF, DEFAULT_WLAN_ON, RadioId, Router, RouterRpc, WifiClient,
    WifiRadio,
};

use crate::cli::{GlobalOpts, WlanArgs, WlanCommand};
use crate::commands::util::{check_mark, or_dash};
use crate::error::CliError;
use crate::output;
use crate::table::{Align, Table};

pub async fn handle<R: RouterRpc>(
    router: &Router<R>,
    args: WlanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WlanCommand::On { names } => toggle(router, &names, true, global).await,
        WlanCommand::Off { names } => toggle(router, &names, false, global).await,
        WlanCommand::List => {
            let radios = router.radios().await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &radios,
                |r| radio_table(r, color),
                |r| r.id.display_name().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        WlanCommand::Devices => {
            let clients = router.wifi_clients().await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &clients,
                |c| client_table(c, color),
                |c| c.mac.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        WlanCommand::Qr { name } => {
            let id = resolve_single(&name)?;
            let credentials = router.wifi_credentials(id).await?;
            let out = output::render_single(
                global.output,
                &credentials,
                fritzly_core::WifiCredentials::qr_payload,
                fritzly_core::WifiCredentials::qr_payload,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Map a name to one network; names covering several pick the first.
pub fn resolve_single(name: &str) -> Result<RadioId, CliError> {
    let aliases = AliasTable::standard();
    aliases
        .resolve_one(name)
        .ok_or_else(|| CliError::UnknownWlanName {
            names: name.to_owned(),
            known: aliases.names().join(", "),
        })
}

async fn toggle<R: RouterRpc>(
    router: &Router<R>,
    names: &[String],
    enabled: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let default = if enabled {
        DEFAULT_WLAN_ON
    } else {
        DEFAULT_WLAN_OFF
    };
    let selection = AliasTable::standard().select(names, default);
    if !selection.unknown.is_empty() {
        eprintln!("unknown wlan name(s): {}", selection.unknown.join(", "));
    }

    let missing = router.set_radios_enabled(&selection.radios, enabled).await?;
    for id in &missing {
        eprintln!("warning: the router has no {id} network");
    }

    let state = if enabled { "on" } else { "off" };
    for id in selection.radios.iter().filter(|id| !missing.contains(*id)) {
        output::print_output(&format!("{id}: {state}"), global.quiet);
    }
    Ok(())
}

fn radio_table(radios: &[WifiRadio], color: bool) -> String {
    Table::new(["NETWORK", "ACTIVE", "SSID", "CHANNEL", "FREQ"])
        .align([
            Align::Left,
            Align::Center,
            Align::Left,
            Align::Right,
            Align::Left,
        ])
        .header_style(color)
        .rows(radios.iter().map(|r| {
            [
                r.id.display_name().to_owned(),
                check_mark(r.enabled),
                r.ssid.clone(),
                r.channel.to_string(),
                r.band.to_string(),
            ]
        }))
        .render()
}

fn client_table(clients: &[WifiClient], color: bool) -> String {
    Table::new(["HOSTNAME", "MAC ADDRESS", "IP ADDRESS", "SPEED", "SIGNAL"])
        .align([
            Align::Left,
            Align::Left,
            Align::Left,
            Align::Right,
            Align::Right,
        ])
        .limit(0, 32)
        .header_style(color)
        .rows(clients.iter().map(|c| {
            [
                or_dash(c.hostname.as_deref()),
                c.mac.clone(),
                c.ip.clone(),
                or_dash(c.speed),
                or_dash(c.signal),
            ]
        }))
        .render()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fritzly_core::FrequencyBand;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn single_names_resolve() {
        assert_eq!(resolve_single("5").unwrap(), RadioId::Radio2);
        assert_eq!(resolve_single("guest").unwrap(), RadioId::Radio3);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = resolve_single("bogus").unwrap_err();
        assert_eq!(err.exit_code(), -1);
    }

    #[test]
    fn all_resolves_to_first_network() {
        assert_eq!(resolve_single("all").unwrap(), RadioId::Radio1);
    }

    #[test]
    fn radio_table_layout() {
        let radios = [
            WifiRadio {
                id: RadioId::Radio1,
                enabled: true,
                ssid: "Home".into(),
                channel: 6,
                band: FrequencyBand::Ghz2_4,
            },
            WifiRadio {
                id: RadioId::Radio3,
                enabled: false,
                ssid: "Guests".into(),
                channel: 11,
                band: FrequencyBand::Unknown,
            },
        ];
        let table = radio_table(&radios, false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], " NETWORK  ACTIVE  SSID    CHANNEL  FREQ   ");
        assert_eq!(lines[2], " guests    [ ]    Guests       11  -      ");
    }

    #[test]
    fn client_table_fills_gaps_with_dashes() {
        let clients = [WifiClient {
            radio: RadioId::Radio2,
            hostname: None,
            mac: "AA:BB:CC:DD:EE:FF".into(),
            ip: "192.168.178.30".into(),
            speed: Some(866),
            signal: None,
        }];
        let table = client_table(&clients, false);
        let row = table.lines().nth(1).unwrap();
        assert!(row.starts_with(" -         AA:BB:CC:DD:EE:FF"), "row was {row:?}");
        assert!(row.ends_with("    866       - "), "row was {row:?}");
    }
}
