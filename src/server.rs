use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{api, error::MelodyError};

/// Login attempt waiting for the provider's redirect.
///
/// The login flow creates it with the expected `state`; the callback handler
/// fills in `code` (or `error`) and the login flow takes it out.
#[derive(Debug, Clone, Default)]
pub struct PendingAuth {
    pub state: String,
    pub code: Option<String>,
    pub error: Option<String>,
}

impl PendingAuth {
    pub fn new(state: String) -> Self {
        Self {
            state,
            code: None,
            error: None,
        }
    }
}

pub type SharedPendingAuth = Arc<Mutex<PendingAuth>>;

pub fn router(state: SharedPendingAuth) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Binds the callback server and serves it on a background task.
///
/// Binding happens before this returns so an address already in use is
/// reported to the caller instead of being lost inside the task.
pub async fn start_api_server(
    address: &str,
    state: SharedPendingAuth,
) -> Result<JoinHandle<()>, MelodyError> {
    let addr = SocketAddr::from_str(address)
        .map_err(|e| MelodyError::Config(format!("invalid server address {}: {}", address, e)))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MelodyError::AuthFlow(format!("cannot listen on {}: {}", addr, e)))?;
    log::debug!("callback server listening on {}", addr);

    let app = router(state);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("callback server stopped: {}", e);
        }
    }))
}
