mod config;
mod display;
mod models;
mod providers;
mod services;
mod state;
mod sync;

use std::io::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use display::Viewport;
use state::{EtaStore, FeedStore};
use sync::SyncEngine;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");
    config.dashboard.validate();
    tracing::info!(base_url = %config.api_base_url, "Loaded configuration");

    // Start the engine in the background
    let engine =
        Arc::new(SyncEngine::new(&config).expect("Failed to initialize dashboard engine"));
    let feed = engine.feed_store();
    let session = engine.session_store();
    let mut updates = engine.subscribe();

    let engine_clone = engine.clone();
    tokio::spawn(async move {
        engine_clone.start().await;
    });

    println!("{}", display::HELP);

    let mut viewport = Viewport::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            update = updates.recv() => {
                match update {
                    // Lagged just means we render a fresher state than
                    // the notification that woke us
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        render_view(&feed, &session, &mut viewport).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(input)) => match input.trim() {
                        "/quit" => break,
                        "/vehicles" => engine.clone().trigger_refresh().await,
                        stop_id => engine.submit_stop_query(stop_id).await,
                    },
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read input");
                        break;
                    }
                }
            }
        }
    }

    engine.shutdown().await;
}

/// Re-derive the view from the stores and print it. The focus move is
/// consumed here: at most once per ETA session, the viewport recenters
/// on the stop (or the derived map center when the stop record has no
/// valid coordinates).
async fn render_view(feed: &FeedStore, session: &EtaStore, viewport: &mut Viewport) {
    let feed = feed.read().await;
    let mut session = session.write().await;

    let markers = services::view::build_markers(&feed.vehicles, &session);
    let center = services::focus::map_center(&markers);
    if let Some(point) = session.take_focus(center) {
        viewport.focus_on(point);
    }
    let stop_marker = services::focus::stop_target(session.stop.as_ref(), center);

    print!(
        "{}",
        display::render(&feed, &session, &markers, stop_marker, viewport)
    );
    let _ = std::io::stdout().flush();
}
