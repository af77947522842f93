//! Uptime Status Dashboard Binary

use clap::Parser;
use status_dashboard::render::render;
use status_dashboard::{Config, Dashboard, HttpHealthApi, RefreshEngine, Result, ViewStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal status dashboard for a health-check API.
///
/// While running, type `r` to refresh now, `w <px>` to resize the viewport,
/// `s <px>` to scroll and `q` to quit.
#[derive(Parser, Debug)]
#[command(name = "status-dashboard", version, about)]
struct Cli {
    /// JSON configuration file; `DASHBOARD_*` variables and flags override it
    #[arg(long, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the health API
    #[arg(long, env = "DASHBOARD_BASE_URL")]
    base_url: Option<String>,

    /// Service whose history is shown
    #[arg(long, env = "DASHBOARD_SERVICE")]
    service: Option<String>,

    /// Name shown in the headline
    #[arg(long, env = "DASHBOARD_BRAND")]
    brand: Option<String>,

    /// Seconds between refresh cycles
    #[arg(long, env = "DASHBOARD_REFRESH_INTERVAL_SECS")]
    refresh_interval_secs: Option<u64>,

    /// Resize debounce in milliseconds
    #[arg(long, env = "DASHBOARD_DEBOUNCE_MS")]
    debounce_ms: Option<u64>,

    /// HTTP timeout in seconds
    #[arg(long, env = "DASHBOARD_HTTP_TIMEOUT_SECS")]
    http_timeout_secs: Option<u64>,

    /// Initial viewport width in pixels
    #[arg(long, env = "DASHBOARD_VIEWPORT_WIDTH")]
    viewport_width: Option<u32>,

    /// Refresh once, print the dashboard and exit
    #[arg(long)]
    once: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::from_file(path)?;
                config.apply_lookup(|key| std::env::var(key).ok());
                config
            }
            None => Config::from_env(),
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(service) = &self.service {
            config.service = service.clone();
        }
        if let Some(brand) = &self.brand {
            config.brand = brand.clone();
        }
        if let Some(seconds) = self.refresh_interval_secs {
            config.refresh_interval = Duration::from_secs(seconds);
        }
        if let Some(ms) = self.debounce_ms {
            config.resize_debounce = Duration::from_millis(ms);
        }
        if let Some(seconds) = self.http_timeout_secs {
            config.http_timeout = Duration::from_secs(seconds);
        }
        if let Some(width) = self.viewport_width {
            config.initial_viewport_width = width;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    initialize_tracing();

    let cli = Cli::parse();

    info!("Starting status dashboard v{}", env!("CARGO_PKG_VERSION"));

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration failed: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Dashboard configuration - API: {}, Service: {}, Interval: {}s",
        config.base_url,
        config.service,
        config.refresh_interval.as_secs()
    );

    if cli.once {
        return run_once(&config).await;
    }

    let dashboard = match Dashboard::start(&config) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            error!("Dashboard failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let mut views = dashboard.subscribe();
    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                print!("\x1B[2J\x1B[H{}", render(&view, &config.brand));
            }
            line = commands.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if !handle_command(&dashboard, line.trim()) {
                        break;
                    }
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!("Failed to read command: {}", e);
                    stdin_open = false;
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    dashboard.shutdown();
    Ok(())
}

/// Returns false when the user asked to quit
fn handle_command(dashboard: &Dashboard, command: &str) -> bool {
    let mut parts = command.split_whitespace();

    match (parts.next(), parts.next().map(str::parse::<f64>)) {
        (Some("q"), _) => return false,
        (Some("r"), _) => {
            dashboard.retry();
        }
        (Some("w"), Some(Ok(width))) if width >= 0.0 => dashboard.resize(width as u32),
        (Some("s"), Some(Ok(offset))) => dashboard.scroll(offset),
        (None, _) => {}
        _ => warn!("Unknown command: {}", command),
    }

    true
}

async fn run_once(config: &Config) -> Result<()> {
    let api = HttpHealthApi::new(
        config.base_url.clone(),
        config.service.clone(),
        config.http_timeout,
    )?;

    let store = Arc::new(ViewStore::new());
    store.recompute_breakpoints(config.initial_viewport_width);

    let engine = RefreshEngine::new(Arc::new(api), Arc::clone(&store));
    engine.refresh().await;

    print!("{}", render(&store.current(), &config.brand));
    Ok(())
}

/// Initialize structured logging on stderr, keeping stdout for the dashboard
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_every_setting_flag_names_its_variable() {
        let command = Cli::command();
        for arg in command.get_arguments() {
            let id = arg.get_id().as_str();
            if matches!(id, "once" | "help" | "version") {
                continue;
            }
            let env = arg.get_env().and_then(|env| env.to_str()).unwrap_or_default();
            assert!(env.starts_with("DASHBOARD_"), "--{} has no DASHBOARD_* variable", id);
        }
    }

    #[test]
    fn test_flags_parse_into_optional_settings() {
        let cli = Cli::try_parse_from([
            "status-dashboard",
            "--base-url",
            "http://127.0.0.1:7000/",
            "--refresh-interval-secs",
            "30",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:7000/"));
        assert_eq!(cli.refresh_interval_secs, Some(30));
        assert!(!cli.once);
        Cli::command().debug_assert();
    }
}
