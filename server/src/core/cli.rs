use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_HOST, ENV_PORT, ENV_POSTGRES_MAX_CONNECTIONS, ENV_POSTGRES_URL,
};

#[derive(Parser)]
#[command(name = "finance-tracker")]
#[command(version, about = "Personal finance tracking API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// PostgreSQL connection URL
    #[arg(long, global = true, env = ENV_POSTGRES_URL)]
    pub postgres_url: Option<String>,

    /// Maximum number of pooled PostgreSQL connections
    #[arg(long, global = true, env = ENV_POSTGRES_MAX_CONNECTIONS)]
    pub postgres_max_connections: Option<u32>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Print the resolved configuration and exit
    CheckConfig,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub postgres_url: Option<String>,
    pub postgres_max_connections: Option<u32>,
}

impl Cli {
    /// Split parsed arguments into config overrides and the subcommand
    pub fn into_parts(self) -> (CliConfig, Option<Commands>) {
        let config = CliConfig {
            host: self.host,
            port: self.port,
            config: self.config,
            postgres_url: self.postgres_url,
            postgres_max_connections: self.postgres_max_connections,
        };
        (config, self.command)
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    Cli::parse().into_parts()
}
