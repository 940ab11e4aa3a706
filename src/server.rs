use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr};
use tokio::net::TcpListener;

use crate::{ExportError, Res, api, types::SharedAuthState};

/// Binds the callback listener before the browser is sent anywhere, so a
/// busy port fails the authorization right away.
pub async fn bind(server_addr: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(server_addr).map_err(|e| {
        ExportError::Config(format!("invalid server address {}: {}", server_addr, e))
    })?;

    TcpListener::bind(&addr)
        .await
        .map_err(|e| ExportError::Network(format!("cannot listen on {}: {}", addr, e)))
}

pub async fn start_api_server(listener: TcpListener, state: SharedAuthState) {
    let app = Router::new().route("/callback", get(api::callback).layer(Extension(state)));

    if let Err(e) = axum::serve(listener, app).await {
        tracing::warn!(error = %e, "callback server stopped");
    }
}
