//! banter-server – entry point.
//!
//! Startup order:
//! 1. Parse configuration from environment variables.
//! 2. Initialise structured tracing (JSON in production, pretty in dev).
//! 3. Build the identity verifier and the completion bridge.
//! 4. Build the Axum router and start the HTTP server with graceful shutdown.

mod auth;
mod completion;
mod config;
mod entities;
mod error;
mod handlers;
mod middleware;
mod routes;
mod schemas;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use tracing::{info, warn};

use crate::auth::{IdentityVerifier, JwtVerifier, StaticTokenVerifier};
use crate::completion::OpenAiBridge;
use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: BANTER_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "banter-server starting");

    // ── 3. Collaborators ───────────────────────────────────────────────────────
    let verifier = build_verifier(&cfg)?;

    let bridge = OpenAiBridge::new(
        cfg.openai_base_url.clone(),
        cfg.openai_api_key.clone(),
        cfg.openai_model.clone(),
        Duration::from_secs(cfg.completion_timeout_secs),
    )
    .context("failed to build completion client")?;
    if cfg.openai_api_key.is_none() {
        warn!("BANTER_OPENAI_API_KEY is not set; completion requests are sent unauthenticated");
    }
    info!(base_url = %cfg.openai_base_url, model = %bridge.model(), "completion bridge ready");

    if !cfg.serialize_appends {
        warn!("per-chat append serialization disabled; concurrent replies may share history");
    }

    // ── 4. HTTP server with graceful shutdown ──────────────────────────────────
    let addr: SocketAddr = cfg
        .bind_address
        .parse()
        .with_context(|| format!("invalid BANTER_BIND '{}'", cfg.bind_address))?;
    let state = Arc::new(AppState::new(cfg, verifier, Arc::new(bridge)));
    let app = routes::build(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("banter-server stopped");
    Ok(())
}

/// JWT when a secret is configured, otherwise the dev token table.
/// Refuses to start with neither.
fn build_verifier(cfg: &Config) -> anyhow::Result<Arc<dyn IdentityVerifier>> {
    if let Some(secret) = &cfg.jwt_secret {
        info!(
            issuer = cfg.jwt_issuer.as_deref().unwrap_or("-"),
            audience = cfg.jwt_audience.as_deref().unwrap_or("-"),
            "verifying bearer tokens as HS256 JWTs"
        );
        return Ok(Arc::new(JwtVerifier::new(
            secret,
            cfg.jwt_issuer.as_deref(),
            cfg.jwt_audience.as_deref(),
        )));
    }

    let verifier = StaticTokenVerifier::new(cfg.dev_tokens.clone());
    if verifier.is_empty() {
        bail!("no identity verifier configured: set BANTER_JWT_SECRET or BANTER_DEV_TOKENS");
    }
    warn!(
        users = cfg.dev_tokens.len(),
        "using static development tokens; do not use in production"
    );
    Ok(Arc::new(verifier))
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c   => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
