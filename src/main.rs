use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use mobile_version::config::{LookupConfig, cache_path};
use mobile_version::{AppVersion, Platform, logging};

#[derive(Parser, Debug)]
#[command(name = "mobile-version")]
#[command(version, about = "Look up the latest published version of a mobile app")]
struct Cli {
    /// JSON configuration file (bundleId, useCache, cacheFilePath, cachePeriod, http, endpoints)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bundle identifier (iOS) / package name (Android)
    #[arg(short, long, global = true)]
    bundle_id: Option<String>,

    /// Cache results in the default cache file
    #[arg(long, global = true)]
    cache: bool,

    /// Cache results in this file
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    /// How long cached versions stay valid, in seconds
    #[arg(long, global = true)]
    cache_period: Option<u64>,

    /// Request timeout in seconds (at least 1)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Also write logs to this file (JSON lines)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Latest version on the App Store
    Ios {
        /// App Store country code
        #[arg(long)]
        country: Option<String>,
    },
    /// Latest version on Google Play
    Android,
    /// Latest version on both storefronts
    All {
        /// App Store country code
        #[arg(long)]
        country: Option<String>,
    },
}

impl Cli {
    /// Merge the config file (if any) with command-line overrides
    fn lookup_config(&self) -> anyhow::Result<LookupConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => LookupConfig::default(),
        };

        if let Some(bundle_id) = &self.bundle_id {
            config.bundle_id = Some(bundle_id.clone());
        }
        if let Some(path) = &self.cache_file {
            config = config.with_cache_file(path);
        } else if self.cache {
            config.use_cache = true;
            if config.cache_file_path.is_none() {
                config.cache_file_path = Some(cache_path());
            }
        }
        if let Some(period) = self.cache_period {
            config.cache_period = Some(period);
        }
        if let Some(timeout) = self.timeout {
            config.http.timeout_secs = timeout;
        }
        if self.insecure {
            config.http.accept_invalid_certs = true;
        }

        Ok(config)
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = AppVersion::new(cli.lookup_config()?)?;

    match &cli.command {
        Command::Ios { country } => {
            println!("{}", app.get_ios(country.as_deref()).await?);
        }
        Command::Android => {
            println!("{}", app.get_android().await?);
        }
        Command::All { country } => {
            let (ios, android) = tokio::join!(app.get_ios(country.as_deref()), app.get_android());

            // Report both storefronts before failing on the first error
            let mut failed = None;
            for (platform, result) in [(Platform::Ios, ios), (Platform::Android, android)] {
                match result {
                    Ok(version) => println!("{}: {}", platform, version),
                    Err(e) => {
                        eprintln!("{}: {}", platform, e);
                        failed.get_or_insert(e);
                    }
                }
            }
            if let Some(e) = failed {
                return Err(e.into());
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}
