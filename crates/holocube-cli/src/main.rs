// CLI crate: user-facing binaries document themselves through clap.
#![allow(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod assets;
mod console;
mod device;
mod icon_pack;
mod os_layout;
mod pomodoro;
mod preview;
mod showcase;
mod wireframe;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use holocube::{ClientConfig, HoloCube};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Timeout for the long-running apps when nothing else is configured.
const APP_TIMEOUT_SECS: f64 = 15.0;

#[derive(Parser)]
#[command(name = "holocube")]
#[command(about = "Drive a HoloCube display over its HTTP API", long_about = None)]
#[command(version, propagate_version = true)]
struct Cli {
    /// Device IP address or host name
    #[arg(long, global = true, env = "HOLOCUBE_IP")]
    ip: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "HOLOCUBE_TIMEOUT")]
    timeout: Option<f64>,

    /// TOML file with client settings (host, timeout, batching)
    #[arg(long, global = true, env = "HOLOCUBE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show off the library: message, timer, progress, alert or OS screen
    Demo {
        #[arg(value_enum)]
        demo: showcase::Demo,
    },
    /// Pomodoro timer with habit trackers and a lobster buddy
    Pomodoro(pomodoro::Args),
    /// On-device 3D wireframe demos
    Wireframe {
        #[arg(long, value_enum, default_value_t = wireframe::Demo::All)]
        demo: wireframe::Demo,
    },
    /// Draw sixteen icons from an RPG icon pack as a 4x4 grid
    IconPack(icon_pack::Args),
    /// Status/body/footer layout walkthrough with a short countdown
    OsLayout {
        /// Directory holding the tracker icons
        #[arg(long, env = "HOLOCUBE_ICONS", default_value = assets::DEFAULT_ICON_DIR)]
        icons: PathBuf,
    },
    /// Device utilities: WiFi, GIFs, reboot
    Device {
        #[command(subcommand)]
        command: device::DeviceCommand,
    },
    /// Render a screen offline to a PNG
    Preview(preview::Args),
}

/// Connection flags shared by every subcommand.
struct Connection {
    ip: Option<String>,
    timeout: Option<f64>,
    config: Option<PathBuf>,
}

impl Connection {
    /// Resolve settings: built-in defaults, then the config file, then flags.
    ///
    /// Long-running apps get a longer timeout unless a flag or the config
    /// file sets one.
    fn client_config(&self, app_timeout: bool) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ClientConfig::default(),
        };
        if let Some(ip) = &self.ip {
            config.host.clone_from(ip);
        }
        match self.timeout {
            Some(secs) => config.timeout_secs = Some(secs),
            None if app_timeout && config.timeout_secs.is_none() => {
                config.timeout_secs = Some(APP_TIMEOUT_SECS);
            }
            None => {}
        }
        Ok(config)
    }

    fn client(&self, app_timeout: bool) -> Result<HoloCube> {
        let config = self.client_config(app_timeout)?;
        debug!(host = %config.host, timeout = ?config.timeout(), "client settings");
        HoloCube::with_config(&config).context("failed to build HTTP client")
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug,hyper=warn,reqwest=warn")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        ip,
        timeout,
        config,
        verbose,
        command,
    } = Cli::parse();
    init_tracing(verbose);
    let conn = Connection {
        ip,
        timeout,
        config,
    };

    match command {
        Commands::Demo { demo } => showcase::run(&conn.client(false)?, demo).await,
        Commands::Pomodoro(args) => pomodoro::run(&conn.client(true)?, args).await,
        Commands::Wireframe { demo } => wireframe::run(&conn.client(false)?, demo).await,
        Commands::IconPack(args) => icon_pack::run(conn.client(true)?, &args).await,
        Commands::OsLayout { icons } => os_layout::run(&conn.client(true)?, &icons).await,
        Commands::Device { command } => device::run(&conn.client(false)?, command).await,
        Commands::Preview(args) => preview::run(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(ip: Option<&str>, timeout: Option<f64>, config: Option<PathBuf>) -> Connection {
        Connection {
            ip: ip.map(String::from),
            timeout,
            config,
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = conn(Some("10.0.0.9"), Some(2.5), None)
            .client_config(true)
            .unwrap();
        assert_eq!(config.host, "10.0.0.9");
        assert_eq!(config.timeout_secs, Some(2.5));
    }

    #[test]
    fn test_apps_default_to_longer_timeout() {
        let app = conn(None, None, None).client_config(true).unwrap();
        assert_eq!(app.timeout_secs, Some(APP_TIMEOUT_SECS));
        let plain = conn(None, None, None).client_config(false).unwrap();
        assert_eq!(plain, ClientConfig::default());
    }

    #[test]
    fn test_config_file_timeout_wins_over_app_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.toml");
        std::fs::write(&path, "host = \"cube.local\"\ntimeout_secs = 3.0\n").unwrap();

        let config = conn(None, None, Some(path.clone())).client_config(true).unwrap();
        assert_eq!(config.host, "cube.local");
        assert_eq!(config.timeout_secs, Some(3.0));

        let config = conn(Some("10.1.1.1"), None, Some(path)).client_config(true).unwrap();
        assert_eq!(config.host, "10.1.1.1");
    }

    #[test]
    fn test_config_file_without_timeout_keeps_app_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.toml");
        std::fs::write(&path, "host = \"cube.local\"\n").unwrap();

        let app = conn(None, None, Some(path.clone())).client_config(true).unwrap();
        assert_eq!(app.host, "cube.local");
        assert_eq!(app.timeout_secs, Some(APP_TIMEOUT_SECS));
        let plain = conn(None, None, Some(path)).client_config(false).unwrap();
        assert_eq!(plain.timeout_secs, None);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = conn(None, None, Some(PathBuf::from("/nonexistent/cube.toml")))
            .client_config(false)
            .unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }

    #[test]
    fn test_parses_nested_subcommands() {
        let cli = Cli::try_parse_from(["holocube", "--ip", "1.2.3.4", "device", "play", "cat.gif"]).unwrap();
        assert_eq!(cli.ip.as_deref(), Some("1.2.3.4"));
        assert!(matches!(
            cli.command,
            Commands::Device {
                command: device::DeviceCommand::Play { ref name }
            } if name == "cat.gif"
        ));
    }
}
