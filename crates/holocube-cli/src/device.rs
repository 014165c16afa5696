//! Device utilities

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use holocube::client::{GifList, WifiNetwork};
use holocube::HoloCube;

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Show WiFi connection state
    Status,
    /// List visible WiFi networks, strongest first
    Scan,
    /// Join a WiFi network
    Connect {
        ssid: String,
        #[arg(long, env = "HOLOCUBE_WIFI_PASSWORD", default_value = "")]
        password: String,
    },
    /// List GIFs stored on the device
    Gifs,
    /// Play a stored GIF
    Play { name: String },
    /// Stop GIF playback
    Stop,
    /// Restart the device
    Reboot,
}

fn kib(bytes: u64) -> String {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
}

fn print_networks(mut networks: Vec<WifiNetwork>) {
    networks.sort_by(|a, b| b.rssi.cmp(&a.rssi));
    for net in &networks {
        let lock = if net.enc == 7 { " " } else { "*" };
        println!("  {lock} {:>4} dBm  {}", net.rssi, net.ssid);
    }
    println!("{} network(s)", networks.len());
}

fn print_gifs(list: &GifList) {
    for gif in &list.files {
        println!("  {:<32} {}", gif.name, kib(gif.size));
    }
    println!(
        "{} used of {}, {} free",
        kib(list.used_bytes),
        kib(list.total_bytes),
        kib(list.free_bytes).green()
    );
}

pub async fn run(cube: &HoloCube, command: DeviceCommand) -> Result<()> {
    match command {
        DeviceCommand::Status => {
            let status = cube.wifi_status().await.context("status request failed")?;
            if status.connected {
                println!("{} {} ({})", "connected".green().bold(), status.ssid, status.ip);
            } else {
                println!("{}", "not connected".yellow().bold());
            }
        }
        DeviceCommand::Scan => {
            println!("{}", "Scanning...".cyan());
            print_networks(cube.wifi_scan().await.context("scan failed")?);
        }
        DeviceCommand::Connect { ssid, password } => {
            let resp = cube
                .wifi_connect(&ssid, &password)
                .await
                .with_context(|| format!("failed to join {ssid}"))?;
            println!("{} {}", resp.status.green(), resp.message.unwrap_or_default());
        }
        DeviceCommand::Gifs => print_gifs(&cube.list_gifs().await.context("listing GIFs failed")?),
        DeviceCommand::Play { name } => {
            let resp = cube
                .play_gif(&name)
                .await
                .with_context(|| format!("cannot play {name}"))?;
            println!("{} {name}", resp.status.green());
        }
        DeviceCommand::Stop => {
            cube.stop_gif().await.context("stop failed")?;
            println!("{}", "stopped".green());
        }
        DeviceCommand::Reboot => {
            cube.reboot().await.context("reboot failed")?;
            println!("{}", "rebooting".yellow());
        }
    }
    Ok(())
}
