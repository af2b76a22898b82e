/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config load -> AuthService + Metrics -> Router
 * - Serve over TLS (axum-server + rustls) or plaintext (--insecure)
 */
use std::{panic, sync::Arc};

use anyhow::{Context, Result, bail};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::cli::{Args, LogLevel, parse_bind_addr};
use crate::config::Config;
use crate::middleware;
use crate::services::{auth::build_auth_service, metrics::Metrics};
use crate::state::AppState;

fn init_tracing(level: LogLevel) {
    // RUST_LOG wins when set; otherwise --log-level.
    // Ex:
    // RUST_LOG=info,jwt_subrequest_auth=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Handler panics are turned into 500s by CatchPanicLayer; make sure they
        // still show up in the structured log.
        tracing::error!(?info, "recovered panic");
        default_hook(info);
    }))
}

pub async fn run(args: Args) -> Result<()> {
    init_tracing(args.log_level);
    init_panic_hook();

    // keyFrom.source=env may point at variables kept in a local .env file.
    dotenvy::dotenv().ok();

    let state = build_state(&args).context("couldn't initialize server")?;
    let app = build_router(state);

    if args.insecure {
        let addr = parse_bind_addr(&args.insecure_addr)
            .with_context(|| format!("invalid --insecure-addr: {}", args.insecure_addr))?;
        tracing::info!(%addr, "starting server (plaintext)");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("bind {addr}"))?;
        axum::serve(listener, app).await.context("error running server")?;
    } else {
        let addr = parse_bind_addr(&args.addr)
            .with_context(|| format!("invalid --addr: {}", args.addr))?;
        let (Some(cert), Some(key)) = (&args.tls_cert, &args.tls_key) else {
            bail!("tls-key and tls-cert are required in TLS mode");
        };
        let tls = RustlsConfig::from_pem_file(cert, key)
            .await
            .context("load TLS key/cert")?;
        tracing::info!(%addr, "starting server (TLS)");

        axum_server::bind_rustls(addr, tls)
            .serve(app.into_make_service())
            .await
            .context("error running server")?;
    }

    Ok(())
}

fn build_state(args: &Args) -> Result<AppState> {
    let config = Config::load(&args.config)?;
    tracing::info!(
        config = %args.config.display(),
        claims_source = ?config.claims_source,
        "loaded configuration"
    );

    let auth = build_auth_service(&config)?;
    let metrics = Arc::new(Metrics::new().context("build metrics recorder")?);

    Ok(AppState::new(auth, metrics))
}

fn build_router(state: AppState) -> Router {
    middleware::http::apply(api::routes(state))
}
