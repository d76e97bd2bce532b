use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use std::{sync::Arc, time::Duration};

use crate::{ServerError, accounts, transactions};
use engine::Engine;

/// Network and request settings of the HTTP API.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Requests running longer than this are cancelled and answered with 408.
    pub request_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout: None,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    request_timeout: Option<Duration>,
}

/// Cancels the handler once the configured deadline passes.
///
/// Dropping a posting mid-flight drops its DB transaction, which rolls back
/// and releases the balance lock.
async fn request_timeout(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(limit) = state.request_timeout else {
        return next.run(request).await;
    };

    let method = request.method().clone();
    let uri = request.uri().clone();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%method, %uri, "request timed out after {limit:?}");
            ServerError::Timeout.into_response()
        }
    }
}

async fn status() -> &'static str {
    "ok"
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/accounts", post(accounts::account_new))
        .route("/accounts/{account_id}", get(accounts::get))
        .route("/accounts/{account_id}/balance", get(accounts::balance))
        .route(
            "/accounts/{account_id}/transactions",
            get(accounts::transactions),
        )
        .route("/transactions", post(transactions::transaction_new))
        .layer(middleware::from_fn_with_state(state.clone(), request_timeout))
        .with_state(state)
}

/// Builds the API router around `engine`.
pub fn app(engine: Engine, config: &ServerConfig) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        request_timeout: config.request_timeout,
    })
}

pub async fn run(engine: Engine, config: ServerConfig) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind((config.bind.as_str(), config.port)).await?;
    run_with_listener(engine, config, listener).await
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, &config)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
