//! Gateway process: liveness HTTP server plus the Discord session feeding the dispatcher.

use crate::channels::{self, ChannelHandle, DiscordChannel, InboundMessage};
use crate::commands::Dispatcher;
use crate::config::{self, Config};
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Body of every liveness response.
pub const HEALTH_BODY: &str = "ok";

/// Router for the liveness responder: GET / returns 200 "ok".
pub fn health_router() -> Router {
    Router::new().route("/", get(health_http))
}

/// GET / returns a constant body (for hosting-platform probes).
async fn health_http() -> &'static str {
    HEALTH_BODY
}

/// Serve the liveness router on an already bound listener until the task is dropped.
pub async fn serve_health(listener: TcpListener) -> Result<()> {
    axum::serve(listener, health_router())
        .await
        .context("health server exited")
}

/// Run the bot: bind the liveness port, log in to Discord, and dispatch each inbound
/// message on its own task. Blocks until the Discord session ends or a shutdown signal arrives.
/// Fails when no Discord token is configured, the port cannot be bound, or login fails.
pub async fn run_gateway(config: Config) -> Result<()> {
    let token = config::require_discord_token(&config)?;

    let bind_addr = format!("{}:{}", config.health.bind.trim(), config.health.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("HTTP server listening on {}", bind_addr);
    tokio::spawn(async move {
        if let Err(e) = serve_health(listener).await {
            log::error!("{:#}", e);
        }
    });

    if config.news.api_key.is_none() {
        log::warn!("{} not set; !news will answer with a notice", config::ENV_NEWS_API);
    }
    if config.inference.token.is_none() {
        log::warn!("{} not set; inference calls will likely be rejected", config::ENV_HF_TOKEN);
    }
    log::info!("inference model: {}", config.inference.model);

    let (inbound_tx, inbound_rx) = mpsc::channel::<InboundMessage>(64);
    let mut client = channels::connect(&token, inbound_tx)
        .await
        .context("creating discord client")?;
    let discord: Arc<dyn ChannelHandle> = Arc::new(DiscordChannel::new(client.http.clone()));
    let dispatcher = Dispatcher::from_config(&config);
    tokio::spawn(run_dispatch_loop(dispatcher, discord, inbound_rx));

    let shard_manager = client.shard_manager.clone();
    tokio::select! {
        res = client.start() => res.context("discord login failed")?,
        _ = shutdown_signal() => {
            log::info!("shutdown signal received, closing discord session");
            shard_manager.shutdown_all().await;
        }
    }
    log::info!("gateway stopped");
    Ok(())
}

/// Receive inbound messages and handle each on a separate task, so a slow outbound call
/// does not hold up later messages. Replies are therefore not ordered.
async fn run_dispatch_loop(
    dispatcher: Dispatcher,
    channel: Arc<dyn ChannelHandle>,
    mut inbound_rx: mpsc::Receiver<InboundMessage>,
) {
    while let Some(msg) = inbound_rx.recv().await {
        let dispatcher = dispatcher.clone();
        let channel = channel.clone();
        tokio::spawn(async move {
            dispatcher.handle(channel.as_ref(), &msg).await;
        });
    }
    log::debug!("dispatch loop stopped: inbound channel closed");
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
