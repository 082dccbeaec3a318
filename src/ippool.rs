//! Entrypoint for the `ippool` binary.
//!
//! Builds an address pool from CLI args or a config file, runs one operation against it,
//! and prints the result.

use args::ippool::{Args, Command};
use clap::Parser;
use common::{
    error::Error,
    logging::enable_logger,
    profiler::start_puffin_server,
    summary::{AllocationSummary, CheckSummary, PoolSummary},
};
use ip_pool::Pool;

mod args;
mod common;

pub fn main() {
    // Parse CLI args
    let args = Args::parse();

    // Initialize logging
    if let Err(error) = enable_logger(args.verbose) {
        eprintln!("Failed to initialize logging: {error}");
        std::process::exit(1);
    }

    // Start the profiler if requested
    #[allow(clippy::let_unit_value)]
    let _server = start_puffin_server(&args.profiler_args);

    if let Err(error) = run(&args) {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

/// Build the configured pool and run the requested command against it
fn run(args: &Args) -> Result<(), Error> {
    let config = args.data()?;
    let mut pool = config.build_pool()?;
    log::debug!("Loaded pool {}", pool.repr());

    match &args.command {
        Command::Show { with_prefix } => match (args.json, *with_prefix) {
            (true, _) => println!(
                "{}",
                serde_json::to_string_pretty(&PoolSummary::new(&pool, *with_prefix))?
            ),
            (false, true) => println!("{}", pool.repr()),
            (false, false) => println!("{pool}"),
        },
        Command::Allocate { count } => {
            let allocated = (0..*count)
                .map(|_| pool.allocate())
                .collect::<Result<Vec<_>, _>>()?;
            match args.json {
                true => println!(
                    "{}",
                    serde_json::to_string_pretty(&AllocationSummary {
                        allocated,
                        state: PoolSummary::new(&pool, false),
                    })?
                ),
                false => {
                    for addr in &allocated {
                        println!("{addr}");
                    }
                }
            }
        }
        Command::Reserve { addresses } => {
            pool.set_used_ips(addresses)?;
            log::info!("Reserved {} address(es)", addresses.len());
            print_state(&pool, args.json)?;
        }
        Command::Release { addresses } => {
            pool.unset_used_ips(addresses)?;
            log::info!("Released {} address(es)", addresses.len());
            print_state(&pool, args.json)?;
        }
        Command::Cleanup => {
            pool.cleanup_used_ips();
            print_state(&pool, args.json)?;
        }
        Command::List { used, with_prefix } => {
            let addrs = match *used {
                true => pool.list_used_ip_strings(*with_prefix)?,
                false => pool.list_available_ip_strings(*with_prefix)?,
            };
            match args.json {
                true => println!("{}", serde_json::to_string_pretty(&addrs)?),
                false => {
                    for addr in addrs {
                        println!("{addr}");
                    }
                }
            }
        }
        Command::Check { address } => {
            let summary = CheckSummary {
                address: address.clone(),
                in_pool: pool.contains(address.as_str())?,
                available: pool.is_in_available_ip_pool(address.as_str())?,
                used: pool.is_in_used_ips(address.as_str())?,
            };
            match args.json {
                true => println!("{}", serde_json::to_string_pretty(&summary)?),
                false => println!(
                    "{}: {}",
                    address,
                    match (summary.available, summary.used) {
                        (true, _) => "available",
                        (_, true) => "used",
                        _ => "not in pool",
                    }
                ),
            }
        }
    }
    Ok(())
}

/// Print the available and used ranges, or a full JSON summary
fn print_state(pool: &Pool, json: bool) -> Result<(), Error> {
    match json {
        true => println!(
            "{}",
            serde_json::to_string_pretty(&PoolSummary::new(pool, false))?
        ),
        false => {
            println!("available: {}", join(pool.available()));
            println!("used: {}", join(pool.used()));
        }
    }
    Ok(())
}

fn join(intervals: &[ip_pool::Interval]) -> String {
    intervals
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
