//! End-to-end client tests against an in-process mock device.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use holocube::prelude::*;
use holocube::screens::TimerView;
use holocube::Error;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Request {
    method: Method,
    path: String,
    body: Value,
}

type Log = Arc<Mutex<Vec<Request>>>;

async fn device(State(log): State<Log>, method: Method, uri: Uri, body: Bytes) -> impl IntoResponse {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();
    log.lock().unwrap().push(Request {
        method: method.clone(),
        path: path.clone(),
        body: body.clone(),
    });

    match (method, path.as_str()) {
        (Method::GET, "/api/v1/wifi/status") => (
            StatusCode::OK,
            Json(json!({"connected": true, "ssid": "lab", "ip": "192.168.7.80"})),
        ),
        (Method::GET, "/api/v1/wifi/scan") => (
            StatusCode::OK,
            Json(json!([
                {"ssid": "lab", "rssi": -48, "enc": 4},
                {"ssid": "guest", "rssi": -77, "enc": 7}
            ])),
        ),
        (Method::GET, "/api/v1/gif") => (
            StatusCode::OK,
            Json(json!({
                "files": [{"name": "cat.gif", "size": 20480}],
                "usedBytes": 20480, "totalBytes": 1048576, "freeBytes": 1028096
            })),
        ),
        (Method::POST, "/api/v1/gif/play") if body["name"] == "missing.gif" => (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": "GIF not found"})),
        ),
        (Method::POST, "/api/v1/draw/batch")
            if body["commands"]
                .as_array()
                .is_some_and(|cmds| cmds.iter().any(|c| c["text"] == "fail")) =>
        {
            (
                StatusCode::OK,
                Json(json!({"status": "error", "message": "out of memory"})),
            )
        }
        (Method::POST, "/api/v1/draw/batch") => {
            let n = body["commands"].as_array().map_or(0, Vec::len);
            (StatusCode::OK, Json(json!({"status": "ok", "processed": n})))
        }
        // firmware without the endpoint answers 200 with an error body
        (Method::POST, "/api/v1/reboot") => (
            StatusCode::OK,
            Json(json!({"status": "error", "message": "busy"})),
        ),
        _ => (StatusCode::OK, Json(json!({"status": "ok"}))),
    }
}

async fn start_device() -> (SocketAddr, Log) {
    let log: Log = Arc::default();
    let app = Router::new().fallback(device).with_state(Arc::clone(&log));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, log)
}

/// A device that answers every request with a plain-text body.
async fn start_garbled_device() -> SocketAddr {
    let app = Router::new().fallback(|| async { "oops" });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> HoloCube {
    let mut config = ClientConfig::for_host(addr.to_string());
    config.batch.pause_ms = 0;
    HoloCube::with_config(&config).unwrap()
}

fn requests(log: &Log) -> Vec<Request> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn test_primitives_hit_their_endpoints() {
    let (addr, log) = start_device().await;
    let cube = client(addr);

    cube.clear(Color::BLACK).await.unwrap();
    cube.circle(120, 120, 50, Color::RED, true).await.unwrap();
    cube.text(60, 100, "Hello!", TextStyle::new().size(4).color(Color::CYAN))
        .await
        .unwrap();

    let reqs = requests(&log);
    assert_eq!(reqs.len(), 3);
    assert_eq!(reqs[0].path, "/api/v1/draw/clear");
    assert_eq!(reqs[0].body, json!({"color": "#000000"}));
    assert_eq!(reqs[1].path, "/api/v1/draw/circle");
    assert_eq!(
        reqs[1].body,
        json!({"x": 120, "y": 120, "r": 50, "color": "#ff0000", "fill": true})
    );
    assert_eq!(
        reqs[2].body,
        json!({"x": 60, "y": 100, "text": "Hello!", "size": 4, "color": "#00ffff"})
    );
    assert!(reqs.iter().all(|r| r.method == Method::POST));
}

#[tokio::test]
async fn test_send_batched_splits_and_sums() {
    let (addr, log) = start_device().await;
    let cube = client(addr);

    let cmds: Vec<DrawCommand> = (0..130)
        .map(|i| DrawCommand::fill_rect(i, 0, 1, 1, Color::WHITE))
        .collect();
    let resp = cube.send_batched(&cmds).await.unwrap();
    assert_eq!(resp.status, "ok");
    assert_eq!(resp.processed, Some(130));

    let reqs = requests(&log);
    let sizes: Vec<usize> = reqs
        .iter()
        .map(|r| r.body["commands"].as_array().unwrap().len())
        .collect();
    assert_eq!(sizes, vec![60, 60, 10]);
    assert!(reqs.iter().all(|r| r.path == "/api/v1/draw/batch"));
    // tagged wire format inside batches
    assert_eq!(reqs[0].body["commands"][0]["type"], "rect");
}

#[tokio::test]
async fn test_send_batched_stops_at_first_failing_chunk() {
    let (addr, log) = start_device().await;
    let cube = client(addr);

    let mut cmds: Vec<DrawCommand> = (0..130)
        .map(|i| DrawCommand::fill_rect(i, 0, 1, 1, Color::WHITE))
        .collect();
    cmds[70] = DrawCommand::text(0, 0, "fail", TextStyle::new());

    let err = cube.send_batched(&cmds).await.unwrap_err();
    match err {
        Error::Device { endpoint, message } => {
            assert_eq!(endpoint, "/api/v1/draw/batch");
            assert_eq!(message, "out of memory");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // the third chunk never goes out
    assert_eq!(requests(&log).len(), 2);
}

#[tokio::test]
async fn test_non_json_reply_is_decode_error() {
    let addr = start_garbled_device().await;
    let cube = client(addr);

    let err = cube.clear(Color::BLACK).await.unwrap_err();
    assert!(matches!(err, Error::Decode { ref endpoint, .. } if endpoint == "/api/v1/draw/clear"));
    assert!(matches!(cube.wifi_status().await, Err(Error::Decode { .. })));
}

#[tokio::test]
async fn test_empty_batch_sends_nothing() {
    let (addr, log) = start_device().await;
    let resp = client(addr).send_batched(&[]).await.unwrap();
    assert_eq!(resp.processed, Some(0));
    assert!(requests(&log).is_empty());
}

#[tokio::test]
async fn test_device_error_body_becomes_error() {
    let (addr, _log) = start_device().await;
    let cube = client(addr);

    let err = cube.play_gif("missing.gif").await.unwrap_err();
    match err {
        Error::Device { endpoint, message } => {
            assert_eq!(endpoint, "/api/v1/gif/play");
            assert_eq!(message, "GIF not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // error body with a 200 status is still an error
    assert!(matches!(cube.reboot().await, Err(Error::Device { .. })));
    assert!(cube.play_gif("cat.gif").await.is_ok());
}

#[tokio::test]
async fn test_unreachable_device_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr).wifi_status().await.unwrap_err();
    assert!(matches!(err, Error::Http { .. }));
}

#[tokio::test]
async fn test_system_endpoints_decode() {
    let (addr, log) = start_device().await;
    let cube = client(addr);

    let status = cube.wifi_status().await.unwrap();
    assert!(status.connected);
    assert_eq!(status.ssid, "lab");

    let networks = cube.wifi_scan().await.unwrap();
    assert_eq!(networks.len(), 2);
    assert_eq!(networks[1].rssi, -77);
    assert_eq!(networks[1].enc, 7);

    let gifs = cube.list_gifs().await.unwrap();
    assert_eq!(gifs.files[0].name, "cat.gif");
    assert_eq!(gifs.free_bytes, 1028096);

    cube.wifi_connect("lab", "hunter2").await.unwrap();
    let reqs = requests(&log);
    let connect = reqs.last().unwrap();
    assert_eq!(connect.path, "/api/v1/wifi/connect");
    assert_eq!(connect.body, json!({"ssid": "lab", "password": "hunter2"}));
}

#[tokio::test]
async fn test_screens_go_out_batched() {
    let (addr, log) = start_device().await;
    let cube = client(addr);

    cube.show_message(&["Done!", "4", "sessions"], &[Color::WHITE, Color::CYAN], 3, Color::BLACK)
        .await
        .unwrap();
    cube.show_timer(90, &TimerView::new().label("BREAK").clear_screen(true))
        .await
        .unwrap();

    let reqs = requests(&log);
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].body["commands"].as_array().unwrap().len(), 4);
    let timer = &reqs[1].body["commands"];
    assert_eq!(timer[2]["text"], "01:30");
    assert_eq!(timer[2]["clear"], true);
    assert_eq!(timer[2]["bg"], "#000000");
}

#[tokio::test]
async fn test_3d_endpoints() {
    let (addr, log) = start_device().await;
    let cube = client(addr);

    cube.animate_3d(&Animation3d::new(Primitive3d::Icosahedron).speeds(2, 3, 1))
        .await
        .unwrap();
    cube.transform_3d(&Transform3d::scale(1.3)).await.unwrap();
    cube.stop_3d().await.unwrap();

    let reqs = requests(&log);
    let paths: Vec<&str> = reqs.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["/api/v1/3d/animate", "/api/v1/3d/transform", "/api/v1/3d/stop"]
    );
    assert_eq!(reqs[0].body["type"], "icosahedron");
    assert_eq!(reqs[0].body["speed_y"], 3);
}

#[tokio::test]
async fn test_status_bar_redraws_only_the_bar() {
    let (addr, log) = start_device().await;
    let cube = client(addr);

    let bar = StatusBar::new().left_text("HOLO").right_text("12:00").battery(40, true);
    cube.draw_status_bar(&Layout::default(), &bar).await.unwrap();

    let reqs = requests(&log);
    assert_eq!(reqs.len(), 1);
    let cmds = reqs[0].body["commands"].as_array().unwrap();
    assert!(cmds.iter().all(|c| c["type"] != "clear"));
    assert!(cmds
        .iter()
        .filter(|c| c["type"] == "rect")
        .all(|c| c["y"].as_i64().unwrap() < 64));
}
