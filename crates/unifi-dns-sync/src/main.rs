// # unifi-dns-sync
//
// Runs exactly one reconciliation pass and exits. Scheduling repeated passes
// is left to cron or a systemd timer.
//
// ## Configuration
//
// Read from the environment. A `.env` file in the working directory is loaded
// first if present; it never overrides variables that are already set.
//
// | Variable | Required | Default |
// |---|---|---|
// | `UNIFI_API_URL` | yes | |
// | `UNIFI_API_KEY` | yes | |
// | `UNIFI_SITE_ID` | yes | |
// | `SYNC_ZONE` | yes | |
// | `DNS_PROVIDER` | yes | (`technitium`) |
// | `TECHNITIUM_API_URL` | for technitium | |
// | `TECHNITIUM_API_TOKEN` | for technitium | |
// | `STATE_DIR` | no | `/var/lib/unifi-sync` |
// | `SYNC_GRACE_PERIOD_SECS` | no | `3600` |
// | `SYNC_MODE` | no | `live` (or `dry-run`) |
// | `LOG_LEVEL` | no | `info` |
//
// ## Exit codes
//
// - 0: pass completed (individual record failures are logged, not fatal)
// - 1: configuration error
// - 2: the pass aborted (zone missing, state corrupt, fetch failed)

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Instrument, Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use unifi_dns_core::config::{DEFAULT_GRACE_PERIOD_SECS, InventoryConfig, ProviderConfig, SyncConfig};
use unifi_dns_core::{FileStateStore, ProviderRegistry, SyncEngine};

const DEFAULT_STATE_DIR: &str = "/var/lib/unifi-sync";

/// Accepted range for `SYNC_GRACE_PERIOD_SECS` (one minute to 30 days)
const GRACE_PERIOD_RANGE: std::ops::RangeInclusive<u64> = 60..=2_592_000;

const SUPPORTED_PROVIDERS: &[&str] = &["technitium"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncExitCode {
    Completed = 0,
    ConfigError = 1,
    RunFailed = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug)]
struct Config {
    unifi_api_url: String,
    unifi_api_key: String,
    unifi_site_id: String,
    zone: String,
    dns_provider: String,
    technitium_api_url: String,
    technitium_api_token: String,
    state_dir: PathBuf,
    grace_period_secs: String,
    mode: String,
    log_level: String,
}

impl Config {
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`; missing optional values get defaults
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let var_or = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            unifi_api_url: var("UNIFI_API_URL"),
            unifi_api_key: var("UNIFI_API_KEY"),
            unifi_site_id: var("UNIFI_SITE_ID"),
            zone: var("SYNC_ZONE"),
            dns_provider: var("DNS_PROVIDER").to_lowercase(),
            technitium_api_url: var("TECHNITIUM_API_URL"),
            technitium_api_token: var("TECHNITIUM_API_TOKEN"),
            state_dir: PathBuf::from(var_or("STATE_DIR", DEFAULT_STATE_DIR)),
            grace_period_secs: var_or(
                "SYNC_GRACE_PERIOD_SECS",
                &DEFAULT_GRACE_PERIOD_SECS.to_string(),
            ),
            mode: var_or("SYNC_MODE", "live").to_lowercase(),
            log_level: var_or("LOG_LEVEL", "info").to_lowercase(),
        }
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("UNIFI_API_URL", &self.unifi_api_url),
            ("UNIFI_API_KEY", &self.unifi_api_key),
            ("UNIFI_SITE_ID", &self.unifi_site_id),
            ("SYNC_ZONE", &self.zone),
            ("DNS_PROVIDER", &self.dns_provider),
        ] {
            if value.is_empty() {
                anyhow::bail!("{} is required", key);
            }
        }

        if !self.unifi_api_url.starts_with("https://") && !self.unifi_api_url.starts_with("http://")
        {
            anyhow::bail!(
                "UNIFI_API_URL must use HTTP or HTTPS scheme. Got: {}",
                self.unifi_api_url
            );
        }

        if !SUPPORTED_PROVIDERS.contains(&self.dns_provider.as_str()) {
            anyhow::bail!(
                "DNS_PROVIDER '{}' is not supported. Supported providers: {}",
                self.dns_provider,
                SUPPORTED_PROVIDERS.join(", ")
            );
        }

        if self.dns_provider == "technitium" {
            if self.technitium_api_url.is_empty() {
                anyhow::bail!("TECHNITIUM_API_URL is required for the technitium provider");
            }
            if self.technitium_api_token.is_empty() {
                anyhow::bail!("TECHNITIUM_API_TOKEN is required for the technitium provider");
            }
        }

        self.grace_period()?;

        match self.mode.as_str() {
            "live" | "dry-run" => {}
            _ => anyhow::bail!(
                "SYNC_MODE '{}' is not valid. Valid modes: live, dry-run",
                self.mode
            ),
        }

        self.level()?;

        Ok(())
    }

    fn grace_period(&self) -> Result<u64> {
        let secs: u64 = self.grace_period_secs.parse().map_err(|_| {
            anyhow::anyhow!(
                "SYNC_GRACE_PERIOD_SECS must be a whole number of seconds. Got: {}",
                self.grace_period_secs
            )
        })?;

        if !GRACE_PERIOD_RANGE.contains(&secs) {
            anyhow::bail!(
                "SYNC_GRACE_PERIOD_SECS must be between {} and {} seconds. Got: {}",
                GRACE_PERIOD_RANGE.start(),
                GRACE_PERIOD_RANGE.end(),
                secs
            );
        }

        Ok(secs)
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    fn dry_run(&self) -> bool {
        self.mode == "dry-run"
    }

    fn sync_config(&self) -> Result<SyncConfig> {
        Ok(SyncConfig::new(&self.zone, &self.state_dir).with_grace_period_secs(self.grace_period()?))
    }

    fn inventory_config(&self) -> InventoryConfig {
        InventoryConfig::unifi(&self.unifi_api_url, &self.unifi_api_key, &self.unifi_site_id)
    }

    fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::Technitium {
            api_url: self.technitium_api_url.clone(),
            api_token: self.technitium_api_token.clone(),
            dry_run: self.dry_run(),
        }
    }
}

fn main() -> ExitCode {
    // Variables already set in the environment take precedence over .env
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::RunFailed.into();
        }
    };

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("sync", run_id = %run_id);

    rt.block_on(run_once(config).instrument(span)).into()
}

fn registry() -> ProviderRegistry {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "technitium")]
    unifi_dns_provider_technitium::register(&registry);

    unifi_dns_source_unifi::register(&registry);

    registry
}

async fn run_once(config: Config) -> SyncExitCode {
    info!(
        zone = %config.zone,
        provider = %config.dns_provider,
        mode = %config.mode,
        state_dir = %config.state_dir.display(),
        "Starting sync"
    );

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "Failed to initialize");
            return SyncExitCode::ConfigError;
        }
    };

    match engine.run().await {
        Ok(result) => {
            info!(
                records_upserted = result.add_success,
                records_upsert_failed = result.add_failed,
                records_deleted = result.delete_success,
                records_delete_failed = result.delete_failed,
                "Sync completed"
            );
            if !result.is_clean() {
                warn!(
                    failed = result.total_failed(),
                    "Some record operations failed; they will be retried on the next run"
                );
            }
            SyncExitCode::Completed
        }
        Err(e) => {
            error!(error = %e, "Sync failed");
            SyncExitCode::RunFailed
        }
    }
}

fn build_engine(config: &Config) -> Result<SyncEngine> {
    let registry = registry();

    let inventory = registry.create_inventory_source(&config.inventory_config())?;
    let provider = registry.create_provider(&config.provider_config())?;
    let state_store = FileStateStore::in_dir(&config.state_dir);

    Ok(SyncEngine::new(
        inventory,
        provider,
        Box::new(state_store),
        config.sync_config()?,
    )?)
}
