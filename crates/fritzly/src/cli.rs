//! Clap derive structures for the `fritzly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fritzly -- administer a FRITZ!Box from the command line
#[derive(Debug, Parser)]
#[command(
    name = "fritzly",
    version,
    about = "Administer a FRITZ!Box router from the command line",
    long_about = "Open and close port forwards, switch Wi-Fi networks, reconnect the \
        WAN link, watch line utilization and read the event log.\n\n\
        Talks to the FRITZ!Box over TR-064 (port 49000 by default).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Router profile to use
    #[arg(long, short = 'p', env = "FRITZ_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router address: host, host:port or URL (overrides profile)
    #[arg(long, short = 'a', env = "FRITZ_ADDRESS", global = true)]
    pub address: Option<String>,

    /// TR-064 user name (overrides profile)
    #[arg(long, short = 'u', env = "FRITZ_USERNAME", global = true)]
    pub username: Option<String>,

    /// Router password
    #[arg(long, env = "FRITZ_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FRITZ_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds [default: 10]
    #[arg(long, env = "FRITZ_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage port forwards to this machine
    Port(PortArgs),

    /// Switch and inspect Wi-Fi networks
    #[command(alias = "wifi")]
    Wlan(WlanArgs),

    /// Print the router's external IPv4 address
    Myip,

    /// Drop the WAN connection so the router redials
    Reconnect(ReconnectArgs),

    /// Live upstream/downstream utilization
    #[command(alias = "speed")]
    Speedmeter(SpeedmeterArgs),

    /// Show the newest router log entries
    Log(LogArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PortArgs {
    #[command(subcommand)]
    pub command: PortCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortCommand {
    /// Forward a port to this machine
    Open(PortTarget),

    /// Disable the forward of a port to this machine
    Close(PortTarget),

    /// List all port forwards
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct PortTarget {
    /// Port number, used both externally and on this machine
    pub port: u16,

    /// Forward UDP
    #[arg(long, conflicts_with = "tcp")]
    pub udp: bool,

    /// Forward TCP (default)
    #[arg(long)]
    pub tcp: bool,

    /// Description of the forward (defaults to the existing one, or HOST-PORT-PROTO)
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WLAN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WlanArgs {
    #[command(subcommand)]
    pub command: WlanCommand,
}

#[derive(Debug, Subcommand)]
pub enum WlanCommand {
    /// Switch networks on (default: 2.4GHz and 5GHz)
    On {
        /// Networks: 1, 2, 3, 2.4, 5, guest, all (comma-separated allowed)
        #[arg(value_name = "NAME")]
        names: Vec<String>,
    },

    /// Switch networks off (default: all)
    Off {
        /// Networks: 1, 2, 3, 2.4, 5, guest, all (comma-separated allowed)
        #[arg(value_name = "NAME")]
        names: Vec<String>,
    },

    /// Show every network with its state
    #[command(alias = "ls")]
    List,

    /// Show stations connected over Wi-Fi
    Devices,

    /// Print the join payload for a network (QR code content)
    Qr {
        /// Network: 1, 2, 3, 2.4, 5, guest (all picks the first)
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WAN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReconnectArgs {
    /// Repeat until the external IP address changes
    #[arg(long)]
    pub newip: bool,

    /// Maximum reconnects with --newip
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: u32,

    /// Seconds to wait after each reconnect before checking the address
    #[arg(long, default_value_t = 5)]
    pub delay: u64,
}

#[derive(Debug, Args)]
pub struct SpeedmeterArgs {
    /// Print a single sample and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Number of lines to show
    #[arg(long = "lastlines", short = 'l', default_value_t = 10)]
    pub lastlines: usize,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display the current configuration (passwords masked)
    Show,

    /// Print the config file location
    Path,

    /// Store the password of the selected profile in the system keyring
    SetPassword,

    /// List configured profiles (* marks the default)
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
