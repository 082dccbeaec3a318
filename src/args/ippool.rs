use std::path::PathBuf;

use ip_pool::{Pool, PoolOptions};

use super::ProfilerArgs;
use crate::common::error::Error;

#[derive(clap::Parser)]
#[clap(author, version, about="Interval-based IP address pool", long_about = None)]
pub struct Args {
    #[command(flatten)]
    pool_args: PoolArgs,

    /// Path to a config file to read
    #[clap(short = 'c', long = "config", conflicts_with = "pool")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,

    /// Print results as JSON
    #[clap(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub profiler_args: ProfilerArgs,

    /// Enable verbose logging
    #[clap(short, long, global = true)]
    pub verbose: bool,
}

impl Args {
    pub fn data(&self) -> Result<Config, Error> {
        match self.config_file {
            Some(ref path) => Config::load(path),
            None => self.pool_args.config().ok_or(Error::NoConfig),
        }
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Print every range in the pool
    Show {
        /// Include the prefix length on each address
        #[clap(long)]
        with_prefix: bool,
    },
    /// Allocate the lowest available addresses
    Allocate {
        /// Number of addresses to allocate
        #[clap(short = 'n', long, default_value = "1")]
        count: usize,
    },
    /// Mark specific addresses as used
    Reserve {
        #[clap(required = true)]
        addresses: Vec<String>,
    },
    /// Return specific used addresses to the pool
    Release {
        #[clap(required = true)]
        addresses: Vec<String>,
    },
    /// Return every used address to the pool
    Cleanup,
    /// List individual addresses
    List {
        /// List used addresses instead of available ones
        #[clap(long)]
        used: bool,
        /// Include the prefix length on each address
        #[clap(long)]
        with_prefix: bool,
    },
    /// Report whether an address is available, used, or outside the pool
    Check { address: String },
}

fn default_separator() -> String {
    PoolOptions::default().separator
}

fn default_ipv4_prefix_len() -> u8 {
    PoolOptions::default().ipv4_prefix_len
}

fn default_ipv6_prefix_len() -> u8 {
    PoolOptions::default().ipv6_prefix_len
}

/// Pool configuration set via CLI args
#[derive(Debug, clap::Args)]
struct PoolArgs {
    /// Address ranges making up the pool, e.g. `192.168.1.1-192.168.1.10,192.168.1.20`
    #[clap(long = "pool")]
    pool: Option<String>,

    /// Separator between ranges
    #[clap(long, default_value_t = default_separator())]
    separator: String,

    /// Prefix length applied to IPv4 addresses given without one
    #[clap(long = "ipv4-prefix-len", default_value_t = default_ipv4_prefix_len())]
    ipv4_prefix_len: u8,

    /// Prefix length applied to IPv6 addresses given without one
    #[clap(long = "ipv6-prefix-len", default_value_t = default_ipv6_prefix_len())]
    ipv6_prefix_len: u8,

    /// Addresses that are already in use
    #[clap(long = "used")]
    used: Vec<String>,
}

impl PoolArgs {
    /// Build a config from CLI args, if a pool was given
    fn config(&self) -> Option<Config> {
        Some(Config {
            pool: self.pool.clone()?,
            separator: self.separator.clone(),
            ipv4_prefix_len: self.ipv4_prefix_len,
            ipv6_prefix_len: self.ipv6_prefix_len,
            used: self.used.clone(),
        })
    }
}

/// Pool configuration. Read from a JSON config file or assembled from CLI args
#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address ranges making up the pool
    pub pool: String,
    /// Separator between ranges
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Prefix length applied to IPv4 addresses given without one
    #[serde(default = "default_ipv4_prefix_len")]
    pub ipv4_prefix_len: u8,
    /// Prefix length applied to IPv6 addresses given without one
    #[serde(default = "default_ipv6_prefix_len")]
    pub ipv6_prefix_len: u8,
    /// Addresses that are already in use
    #[serde(default)]
    pub used: Vec<String>,
}

impl Config {
    /// Read a config from a JSON file
    pub fn load(path: &PathBuf) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|error| match error.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound(path.clone()),
            _ => error.into(),
        })?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn options(&self) -> PoolOptions {
        PoolOptions {
            separator: self.separator.clone(),
            ipv4_prefix_len: self.ipv4_prefix_len,
            ipv6_prefix_len: self.ipv6_prefix_len,
        }
    }

    /// Build the configured pool, with its used addresses already reserved
    pub fn build_pool(&self) -> Result<Pool, ip_pool::Error> {
        Pool::with_used(&self.pool, self.options(), &self.used)
    }
}
