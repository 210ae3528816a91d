//! Outage schedule watcher
//!
//! Runs a watch cycle on start and then on a fixed interval until interrupted.
//! Every option can also be given through the environment.

use anyhow::{Context, bail};
use chrono_tz::Tz;
use clap::Parser;
use outage_watch::browser::{BrowserSource, ConnectionOptions, DEFAULT_USER_AGENT, LaunchOptions};
use outage_watch::config::{DEFAULT_BASE_URL, DEFAULT_STORAGE_PATH, TelegramConfig, WatchConfig};
use outage_watch::{AddressQuery, Watcher};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Parser)]
#[command(name = "outage-watch")]
#[command(version)]
#[command(about = "Power outage schedule watcher", long_about = None)]
struct Cli {
    /// City to select in the address form
    #[arg(long, env = "ADDRESS_CITY")]
    city: String,

    /// Street to select after the city
    #[arg(long, env = "ADDRESS_STREET")]
    street: Option<String>,

    /// Building number to select after the street
    #[arg(long, env = "ADDRESS_BUILDING")]
    building: Option<String>,

    /// Shutdowns page hosting the address form
    #[arg(long, env = "DTEK_BASE_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    base_url: String,

    /// Where the extracted schedule is written every cycle
    #[arg(long, env = "STORAGE_PATH", default_value = DEFAULT_STORAGE_PATH, value_name = "PATH")]
    storage_path: String,

    /// Last notified schedule (default: notified.json next to the storage file)
    #[arg(long, env = "SNAPSHOT_PATH", value_name = "PATH")]
    snapshot_path: Option<String>,

    /// Seconds between two cycles
    #[arg(long, env = "CHECK_INTERVAL_SECS", default_value_t = 900)]
    interval_secs: u64,

    /// Page load and long wait bound in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = 20_000)]
    request_timeout_ms: u64,

    /// User agent presented to the site
    #[arg(long, env = "USER_AGENT")]
    user_agent: Option<String>,

    /// Time zone of the schedule's day markers
    #[arg(long, env = "TZ", default_value = "Europe/Kyiv")]
    timezone: String,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H', env = "HEADED")]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, env = "CHROME_PATH", value_name = "PATH")]
    executable_path: Option<String>,

    /// WebSocket endpoint URL of an already running browser
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<String>,

    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_bot_token: Option<String>,

    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: Option<String>,

    /// Run a single cycle and exit
    #[arg(long, conflicts_with_all = ["show_stored", "send_stored"])]
    once: bool,

    /// Print the stored schedule, merged into periods, and exit
    #[arg(long, conflicts_with = "send_stored")]
    show_stored: bool,

    /// Send the stored schedule through the configured notifiers and exit
    #[arg(long)]
    send_stored: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Trimmed value, `None` when blank
fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Cli {
    fn into_config(self) -> anyhow::Result<WatchConfig> {
        let mut address = AddressQuery::new(self.city);
        if let Some(street) = self.street {
            address = address.with_street(street);
        }
        if let Some(building) = self.building {
            address = address.with_building(building);
        }

        let browser = match present(self.ws_endpoint) {
            Some(url) => BrowserSource::Connect(ConnectionOptions::new(url)),
            None => {
                let mut options = LaunchOptions::new().headless(!self.headed);
                if let Some(path) = present(self.executable_path) {
                    options = options.chrome_path(path.into());
                }
                if let Some(dir) = present(self.user_data_dir) {
                    options = options.user_data_dir(dir.into());
                }
                BrowserSource::Launch(options)
            }
        };

        // TZ may carry the POSIX ":" prefix
        let zone = self.timezone.trim().trim_start_matches(':');
        let timezone: Tz = zone.parse().map_err(|e| anyhow::anyhow!("Unknown time zone '{}': {}", zone, e))?;

        let mut config = WatchConfig::new(address)
            .with_base_url(self.base_url.trim())
            .with_storage_path(self.storage_path.trim())
            .with_interval(Duration::from_secs(self.interval_secs))
            .with_request_timeout(Duration::from_millis(self.request_timeout_ms))
            .with_user_agent(present(self.user_agent).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
            .with_timezone(timezone)
            .with_browser(browser)
            .with_telegram(TelegramConfig::from_parts(self.telegram_bot_token, self.telegram_chat_id));

        if let Some(path) = present(self.snapshot_path) {
            config = config.with_snapshot_path(path);
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str())).init();

    let (once, show_stored, send_stored) = (cli.once, cli.show_stored, cli.send_stored);
    let config = cli.into_config()?;
    config.validate().context("Invalid configuration")?;

    if show_stored {
        let watcher = Watcher::new(config);
        let Some(schedule) = watcher.stored_schedule()? else {
            bail!("No stored schedule at {}", watcher.store().schedule_path().display());
        };
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    if send_stored {
        let (_, delivered) = on_blocking_pool(Watcher::new(config.clone()), &config, |watcher| watcher.resend_stored()).await;
        if !delivered? {
            bail!("Stored schedule was not delivered");
        }
        log::info!("Stored schedule delivered");
        return Ok(());
    }

    log::info!("Outage watcher v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Watching {} at {}", config.address.describe(), config.base_url);
    log::info!("Results will be stored at {}", config.storage_path.display());

    let mut watcher = Watcher::new(config.clone());

    if once {
        let (watcher, result) = on_blocking_pool(watcher, &config, |watcher| watcher.run_cycle()).await;
        shutdown(watcher).await;
        result.context("Watch cycle failed")?;
        return Ok(());
    }

    log::info!("Checking every {}s", config.interval.as_secs());

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let stop = shutdown_signal();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            _ = ticker.tick() => {
                let (returned, result) = on_blocking_pool(watcher, &config, |watcher| watcher.run_cycle()).await;
                watcher = returned;
                if let Err(e) = result {
                    log::error!("Cycle failed: {:#}", e);
                }
            }
        }
    }

    log::info!("Shutting down");
    shutdown(watcher).await;
    Ok(())
}

/// Run `job` on the blocking pool; the watcher comes back with the result.
///
/// A panicking job loses its watcher; a fresh one is built from `config`.
async fn on_blocking_pool<T, F>(mut watcher: Watcher, config: &WatchConfig, job: F) -> (Watcher, anyhow::Result<T>)
where
    T: Send + 'static,
    F: FnOnce(&mut Watcher) -> outage_watch::Result<T> + Send + 'static,
{
    let joined = tokio::task::spawn_blocking(move || {
        let result = job(&mut watcher);
        (watcher, result)
    })
    .await;

    match joined {
        Ok((watcher, result)) => (watcher, result.map_err(anyhow::Error::from)),
        Err(e) => {
            log::error!("Watch task panicked, starting over with a new watcher: {}", e);
            (Watcher::new(config.clone()), Err(anyhow::anyhow!("watch task panicked: {}", e)))
        }
    }
}

async fn shutdown(mut watcher: Watcher) {
    if let Err(e) = tokio::task::spawn_blocking(move || watcher.shutdown()).await {
        log::error!("Browser shutdown panicked: {}", e);
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received SIGINT"),
        _ = terminate => log::info!("Received SIGTERM"),
    }
}
