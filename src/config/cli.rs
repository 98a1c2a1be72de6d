use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the onair binary.
#[derive(Debug, Parser)]
#[command(name = "onair", version, about = "Live show admin service")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "ONAIR_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the admin and public HTTP listeners.
    Serve(Box<ServeArgs>),
    /// Print the stored live show document as JSON.
    Show(ShowArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub storage: StorageOverrides,

    /// Pretty-print the document.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub pretty: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct StorageOverrides {
    /// Override the storage connection string.
    #[arg(long = "storage-connection-string", value_name = "CONNECTION")]
    pub connection_string: Option<String>,

    /// Override the container holding the live show document.
    #[arg(long = "storage-container", value_name = "NAME")]
    pub container: Option<String>,

    /// Override the live show document object name.
    #[arg(long = "storage-object", value_name = "NAME")]
    pub object: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub storage: StorageOverrides,

    /// Override the public listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the administrative listener host.
    #[arg(long = "server-admin-host", value_name = "HOST")]
    pub server_admin_host: Option<String>,

    /// Override the public listener port.
    #[arg(long = "server-public-port", value_name = "PORT")]
    pub public_port: Option<u16>,

    /// Override the administrative listener port.
    #[arg(long = "server-admin-port", value_name = "PORT")]
    pub admin_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Toggle the live show cache.
    #[arg(
        long = "cache-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub cache_enabled: Option<bool>,

    /// Toggle dependency and event telemetry.
    #[arg(
        long = "telemetry-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub telemetry_enabled: Option<bool>,

    /// Override the IANA timezone used to display and enter show times.
    #[arg(long = "display-timezone", value_name = "TZ")]
    pub display_timezone: Option<String>,

    /// Override the environment name shown on the admin page.
    #[arg(long = "display-environment", value_name = "NAME")]
    pub display_environment: Option<String>,
}
