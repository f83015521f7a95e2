use clap::{Parser, Subcommand};

#[derive(Parser, Clone)]
#[clap(
    name = "riemann-forwarder",
    about = "Relays metering samples to a Riemann event index",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// TOML file with publisher defaults (port, transport, default_ttl)
    #[clap(long, global = true)]
    pub config: Option<String>,

    /// Write logs to `forwarder.log` in this directory instead of stderr
    #[clap(long, global = true)]
    pub log_dir: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Publish samples read as JSON lines from a file or stdin
    Publish {
        /// Destination, e.g. riemann://host:5555?transport=tcp
        #[clap(long, short)]
        url: String,
        /// Read samples from this file instead of stdin
        #[clap(long, short)]
        file: Option<String>,
        /// Opaque identifier attached to the log records of this call
        #[clap(long)]
        request_id: Option<String>,
    },

    /// Show the destination a descriptor resolves to
    Resolve {
        #[clap(long, short)]
        url: String,
    },

    /// Print the effective publisher defaults
    Config,
}
