//! Infrastructure implementation of the `ConfigListener` port.
//!
//! An axum server exposes the setup UI plus two JSON endpoints. Handlers
//! never touch the `WifiManager` themselves: each request is forwarded over
//! an mpsc channel to [`dispatch`], which runs in the caller's context and
//! executes requests one at a time.
//!
//! Switching to client mode takes down the access point the operator is
//! connected through, so valid credentials are acknowledged first and
//! applied after [`SWITCH_DELAY`]. The first successful `enable_client` ends
//! the dispatcher, which shuts the server down gracefully.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::{mpsc, oneshot};
use tower_http::trace::TraceLayer;
use wifiprov_common::{
    ApiError, EnableResponse, NetworkCredentials, ScanResponse, WifiNetwork,
};

use crate::application::ports::{ConfigListener, WifiManager};
use crate::domain::ConfigCompletion;
use crate::infra::assets;

/// Queue depth between handlers and the dispatcher.
const REQUEST_QUEUE: usize = 8;

/// Time between acknowledging credentials and tearing the access point down,
/// so the acknowledgement reaches the operator's browser.
pub const SWITCH_DELAY: Duration = Duration::from_secs(1);

/// Work forwarded from an HTTP handler to the dispatcher.
#[derive(Debug)]
pub enum ListenerRequest {
    Scan(oneshot::Sender<Result<Vec<WifiNetwork>, String>>),
    /// Answered as soon as the credentials are queued for application.
    Connect(NetworkCredentials, oneshot::Sender<()>),
}

/// HTTP configuration listener bound to a fixed address.
pub struct HttpConfigListener {
    addr: SocketAddr,
    switch_delay: Duration,
}

impl HttpConfigListener {
    #[must_use]
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            switch_delay: SWITCH_DELAY,
        }
    }
}

impl ConfigListener for HttpConfigListener {
    async fn serve<W: WifiManager>(&self, wifi: &W, interface: &str) -> Result<ConfigCompletion> {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("binding configuration listener on {}", self.addr))?;
        tracing::info!(addr = %self.addr, interface, "configuration listener started");

        let (tx, rx) = mpsc::channel(REQUEST_QUEUE);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(async move {
            axum::serve(listener, router(tx))
                .with_graceful_shutdown(async {
                    let _ = stop_rx.await;
                })
                .await
        });

        let completion = dispatch(wifi, interface, rx, self.switch_delay).await;
        let _ = stop_tx.send(());
        server
            .await
            .context("configuration listener task panicked")?
            .context("configuration listener failed")?;

        let completion =
            completion.context("configuration listener stopped before credentials were applied")?;
        tracing::info!(ssid = %completion.ssid, "configuration listener finished");
        Ok(completion)
    }
}

/// Execute forwarded requests until credentials are applied successfully.
///
/// A `Connect` is acknowledged before `enable_client` runs, `switch_delay`
/// later. If applying fails the error is logged and serving continues, so
/// the operator can resubmit while the access point is still up.
///
/// Returns `None` if every sender is dropped first.
pub async fn dispatch<W: WifiManager>(
    wifi: &W,
    interface: &str,
    mut rx: mpsc::Receiver<ListenerRequest>,
    switch_delay: Duration,
) -> Option<ConfigCompletion> {
    while let Some(request) = rx.recv().await {
        match request {
            ListenerRequest::Scan(reply) => {
                let result = wifi.scan(interface).await.map_err(|e| format!("{e:#}"));
                let _ = reply.send(result);
            }
            ListenerRequest::Connect(credentials, reply) => {
                let _ = reply.send(());
                tokio::time::sleep(switch_delay).await;
                match wifi.enable_client(interface, &credentials).await {
                    Ok(()) => {
                        return Some(ConfigCompletion {
                            ssid: credentials.ssid,
                        });
                    }
                    Err(e) => {
                        tracing::warn!(ssid = %credentials.ssid, error = %format!("{e:#}"), "enable_client failed, still serving");
                    }
                }
            }
        }
    }
    None
}

/// Routes served while the device is in AP mode.
pub fn router(tx: mpsc::Sender<ListenerRequest>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/rescan_wifi", get(rescan_wifi))
        .route("/api/enable_wifi", post(enable_wifi))
        .fallback(static_asset)
        .with_state(tx)
        .layer(TraceLayer::new_for_http())
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiError {
            error: message.into(),
        }),
    )
        .into_response()
}

fn listener_gone() -> Response {
    error(StatusCode::SERVICE_UNAVAILABLE, "configuration is no longer accepted")
}

fn asset_response(name: &str) -> Response {
    match assets::get_asset(name) {
        Some(bytes) => ([(header::CONTENT_TYPE, assets::content_type(name))], bytes).into_response(),
        None => error(StatusCode::NOT_FOUND, format!("no such page: /{name}")),
    }
}

async fn index() -> Response {
    asset_response(assets::INDEX)
}

async fn static_asset(uri: Uri) -> Response {
    asset_response(uri.path().trim_start_matches('/'))
}

async fn rescan_wifi(State(tx): State<mpsc::Sender<ListenerRequest>>) -> Response {
    let (reply, answer) = oneshot::channel();
    if tx.send(ListenerRequest::Scan(reply)).await.is_err() {
        return listener_gone();
    }
    match answer.await {
        Ok(Ok(networks)) => Json(ScanResponse { networks }).into_response(),
        Ok(Err(e)) => error(StatusCode::INTERNAL_SERVER_ERROR, e),
        Err(_) => listener_gone(),
    }
}

async fn enable_wifi(
    State(tx): State<mpsc::Sender<ListenerRequest>>,
    body: Result<Json<NetworkCredentials>, JsonRejection>,
) -> Response {
    let credentials = match body {
        Ok(Json(credentials)) => credentials,
        Err(rejection) => return error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    if let Err(e) = credentials.validate() {
        return error(StatusCode::BAD_REQUEST, e.to_string());
    }

    let (reply, answer) = oneshot::channel();
    if tx
        .send(ListenerRequest::Connect(credentials, reply))
        .await
        .is_err()
    {
        return listener_gone();
    }
    match answer.await {
        Ok(()) => Json(EnableResponse {
            status: "ok".to_string(),
        })
        .into_response(),
        Err(_) => listener_gone(),
    }
}
