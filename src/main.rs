//! expiring-map demo
//!
//! Writes one persistent key and one key with a TTL, waits past the TTL, and
//! shows that only the persistent key survives.

use bytes::Bytes;
use expiring_map::{ExpiringMap, MapConfig};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Demo configuration
struct Config {
    /// TTL given to the expiring key
    ttl: Duration,
    /// Sweep interval of the map
    interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(1),
            interval: expiring_map::DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> anyhow::Result<Self> {
        let mut config = Config::default();
        let mut args = std::env::args().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ttl-ms" | "-t" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--ttl-ms requires a value"))?;
                    config.ttl = Duration::from_millis(value.parse()?);
                }
                "--interval-ms" | "-i" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--interval-ms requires a value"))?;
                    config.interval = Duration::from_millis(value.parse()?);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("expiring-map version {}", expiring_map::VERSION);
                    std::process::exit(0);
                }
                other => anyhow::bail!("unknown argument: {}", other),
            }
        }

        Ok(config)
    }
}

fn print_help() {
    println!(
        r#"
expiring-map demo

USAGE:
    expiring-map [OPTIONS]

OPTIONS:
    -t, --ttl-ms <MS>         TTL of the expiring key (default: 1000)
    -i, --interval-ms <MS>    Sweep interval (default: 100)
    -v, --version             Print version information
    -h, --help                Print this help message

Set RUST_LOG=debug to watch the sweeper.
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_args()?;

    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // No default TTL: keys set via `set` do not expire
    let cache: ExpiringMap<&str, Bytes> =
        ExpiringMap::with_config(MapConfig::new().with_sweep_interval(config.interval))?;

    cache.set("abc", Bytes::from_static(b"persistent"));
    cache.set_with_ttl("123", Bytes::from_static(b"expired"), config.ttl);

    println!("abc present: {}", cache.contains_key("abc"));
    println!("123 present: {}", cache.contains_key("123"));

    info!(ttl_ms = config.ttl.as_millis(), "Waiting for the TTL to pass");
    tokio::time::sleep(config.ttl + config.interval * 2).await;

    println!("abc present: {}", cache.contains_key("abc"));
    println!("123 present: {}", cache.contains_key("123"));

    let stats = cache.stats();
    info!(
        keys = stats.keys,
        expired = stats.expired,
        sweeps = stats.sweeps,
        "Demo finished"
    );

    Ok(())
}
