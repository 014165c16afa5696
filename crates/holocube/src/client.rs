//! Async HTTP client for the device API

use embedded_graphics::prelude::Point;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::color::Color;
use crate::command::{DrawCommand, TextStyle};
use crate::config::{BatchPolicy, ClientConfig};
use crate::error::{Error, Result};

/// Generic `{"status": ...}` reply from the device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    /// `ok`, `error`, or an endpoint-specific state such as `playing`.
    pub status: String,
    /// Human-readable detail, usually present on errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of commands a batch request executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<u32>,
    /// Endpoint-specific fields (`file`, `ip`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiResponse {
    /// An `ok` reply for a batch that executed `processed` commands.
    pub fn ok(processed: u32) -> Self {
        Self {
            status: "ok".to_string(),
            processed: Some(processed),
            ..Self::default()
        }
    }

    /// Whether the device reported `{"status": "error"}`.
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// WiFi state reported by `/api/v1/wifi/status`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct WifiStatus {
    /// Whether the station interface is associated.
    pub connected: bool,
    /// Network name, empty when disconnected.
    pub ssid: String,
    /// Address assigned by DHCP.
    pub ip: String,
}

/// One entry of `/api/v1/wifi/scan`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WifiNetwork {
    /// Network name.
    pub ssid: String,
    /// Signal strength in dBm.
    pub rssi: i32,
    /// Encryption type as reported by the ESP8266 SDK.
    #[serde(default)]
    pub enc: i32,
}

/// A GIF stored on the device.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GifFile {
    /// File name on the device filesystem.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
}

/// `/api/v1/gif` listing with filesystem usage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GifList {
    /// Stored GIFs.
    pub files: Vec<GifFile>,
    /// Bytes in use on the filesystem.
    pub used_bytes: u64,
    /// Filesystem capacity.
    pub total_bytes: u64,
    /// Bytes still free.
    pub free_bytes: u64,
}

#[derive(Serialize)]
struct BatchBody<'a> {
    commands: &'a [DrawCommand],
}

/// Client for one HoloCube.
#[derive(Debug, Clone)]
pub struct HoloCube {
    http: Client,
    base_url: String,
    batch: BatchPolicy,
}

impl HoloCube {
    /// Screen width in pixels.
    pub const SCREEN_WIDTH: i32 = 240;
    /// Screen height in pixels.
    pub const SCREEN_HEIGHT: i32 = 240;

    /// Client with default settings for the device at `host`.
    pub fn new(host: &str) -> Result<Self> {
        Self::with_config(&ClientConfig::for_host(host))
    }

    /// Client for `config.host` with its timeout and batching policy.
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url();
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|source| Error::Http {
                endpoint: base_url.clone(),
                source,
            })?;
        Ok(Self {
            http,
            base_url,
            batch: config.batch,
        })
    }

    /// `http://host[:port]` without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current batching limits.
    pub fn batch_policy(&self) -> BatchPolicy {
        self.batch
    }

    /// Same client with a different batching policy.
    pub fn with_batch_policy(mut self, batch: BatchPolicy) -> Self {
        self.batch = batch;
        self
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: &str, req: RequestBuilder) -> Result<T> {
        let resp = req.send().await.map_err(|source| Error::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|source| Error::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;
        debug!(endpoint, %status, len = bytes.len(), "device response");

        let value: Value = serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if value.get("status").and_then(Value::as_str) == Some("error") {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            warn!(endpoint, %message, "device reported an error");
            return Err(Error::Device {
                endpoint: endpoint.to_string(),
                message,
            });
        }
        serde_json::from_value(value).map_err(|source| Error::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    pub(crate) async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(endpoint, "POST");
        let req = self.http.post(format!("{}{endpoint}", self.base_url)).json(body);
        self.send(endpoint, req).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        debug!(endpoint, "GET");
        let req = self.http.get(format!("{}{endpoint}", self.base_url));
        self.send(endpoint, req).await
    }

    /// Send one command to its single-shot endpoint.
    pub async fn draw(&self, command: &DrawCommand) -> Result<ApiResponse> {
        let body = command.body()?;
        self.post(&command.endpoint(), &body).await
    }

    /// Send commands in a single batch request.
    ///
    /// Large lists should go through [`send_batched`](Self::send_batched),
    /// which respects the device's request limits.
    pub async fn batch(&self, commands: &[DrawCommand]) -> Result<ApiResponse> {
        self.post("/api/v1/draw/batch", &BatchBody { commands }).await
    }

    // Low-level drawing primitives

    /// Fill the screen with `color`.
    pub async fn clear(&self, color: Color) -> Result<ApiResponse> {
        self.draw(&DrawCommand::clear(color)).await
    }

    /// Set one pixel.
    pub async fn pixel(&self, x: i32, y: i32, color: Color) -> Result<ApiResponse> {
        self.draw(&DrawCommand::pixel(Point::new(x, y), color)).await
    }

    /// Line from `(x0, y0)` to `(x1, y1)`.
    pub async fn line(&self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> Result<ApiResponse> {
        self.draw(&DrawCommand::line(Point::new(x0, y0), Point::new(x1, y1), color))
            .await
    }

    /// Rectangle with top-left `(x, y)`.
    pub async fn rect(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color,
        fill: bool,
    ) -> Result<ApiResponse> {
        self.draw(&DrawCommand::Rect {
            x,
            y,
            w,
            h,
            color,
            fill,
        })
        .await
    }

    /// Circle around `(x, y)` with radius `r`.
    pub async fn circle(&self, x: i32, y: i32, r: i32, color: Color, fill: bool) -> Result<ApiResponse> {
        self.draw(&DrawCommand::circle(Point::new(x, y), r, color, fill))
            .await
    }

    /// Triangle through three vertices.
    pub async fn triangle(
        &self,
        p0: Point,
        p1: Point,
        p2: Point,
        color: Color,
        fill: bool,
    ) -> Result<ApiResponse> {
        self.draw(&DrawCommand::triangle(p0, p1, p2, color, fill))
            .await
    }

    /// Ellipse with centre `(x, y)` and radii `rx`, `ry`.
    pub async fn ellipse(
        &self,
        x: i32,
        y: i32,
        rx: i32,
        ry: i32,
        color: Color,
        fill: bool,
    ) -> Result<ApiResponse> {
        self.draw(&DrawCommand::ellipse(Point::new(x, y), rx, ry, color, fill))
            .await
    }

    /// Rectangle with corner radius `r`.
    #[allow(clippy::too_many_arguments)]
    pub async fn roundrect(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        r: i32,
        color: Color,
        fill: bool,
    ) -> Result<ApiResponse> {
        self.draw(&DrawCommand::RoundRect {
            x,
            y,
            w,
            h,
            r,
            color,
            fill,
        })
        .await
    }

    /// Text at `(x, y)`.
    pub async fn text(&self, x: i32, y: i32, text: &str, style: TextStyle) -> Result<ApiResponse> {
        self.draw(&DrawCommand::text(x, y, text, style)).await
    }

    // GIF control

    /// GIFs stored on the device and filesystem usage.
    pub async fn list_gifs(&self) -> Result<GifList> {
        self.get("/api/v1/gif").await
    }

    /// Play a GIF previously uploaded to the device, by file name.
    pub async fn play_gif(&self, name: &str) -> Result<ApiResponse> {
        self.post("/api/v1/gif/play", &json!({ "name": name })).await
    }

    /// Stop GIF playback.
    pub async fn stop_gif(&self) -> Result<ApiResponse> {
        self.post("/api/v1/gif/stop", &json!({})).await
    }

    // System

    /// Current WiFi connection.
    pub async fn wifi_status(&self) -> Result<WifiStatus> {
        self.get("/api/v1/wifi/status").await
    }

    /// Visible networks, in the order the device reports them.
    pub async fn wifi_scan(&self) -> Result<Vec<WifiNetwork>> {
        self.get("/api/v1/wifi/scan").await
    }

    /// Join a network. The device stores the credentials on success.
    pub async fn wifi_connect(&self, ssid: &str, password: &str) -> Result<ApiResponse> {
        self.post(
            "/api/v1/wifi/connect",
            &json!({ "ssid": ssid, "password": password }),
        )
        .await
    }

    /// Restart the device. The reply may arrive before it goes down.
    pub async fn reboot(&self) -> Result<ApiResponse> {
        self.post("/api/v1/reboot", &json!({})).await
    }
}
