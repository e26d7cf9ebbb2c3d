//! Crabfield Simulator
//!
//! Headless offline-mode driver: runs the three local simulators against a
//! field store with a small demo crab roster and periodically logs a state
//! summary. Useful for exercising the core without a field server or a
//! renderer.
//!
//! # Usage
//!
//! ```bash
//! # Defaults (30x30 field)
//! crabfield-sim
//!
//! # Custom field, faster crabs
//! CRABFIELD_FIELD_SIZE=20 CRABFIELD_CRAB_TICK_MS=200 crabfield-sim
//!
//! # With verbose logging
//! RUST_LOG=debug crabfield-sim
//! ```
//!
//! # Environment Variables
//!
//! - `CRABFIELD_CONFIG`: Path to a TOML config file
//! - `CRABFIELD_FIELD_SIZE`, `CRABFIELD_FOOD_CAP`, `CRABFIELD_*_TICK_MS`,
//!   `CRABFIELD_ADVANCE_PROBABILITY`, ...: individual overrides
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)
//!
//! # Signals
//!
//! - SIGTERM/SIGINT: Graceful shutdown (stops all simulator tasks)

use std::time::Duration;

use tokio::signal;
use tracing::info;

use crabfield_core::{Crab, Direction, FieldConfig, FieldStore, Position, SimulatorSet};

/// Starting roster for offline mode.
fn demo_roster() -> Vec<Crab> {
    vec![
        Crab {
            name: "crab-01".to_string(),
            hue: 30.0,
            point: 0,
            direction: Direction::N,
            position: Position::new(10, 10),
        },
        Crab {
            name: "crab-02".to_string(),
            hue: 150.0,
            point: 0,
            direction: Direction::E,
            position: Position::new(15, 3),
        },
        Crab {
            name: "crab-03".to_string(),
            hue: 270.0,
            point: 0,
            direction: Direction::S,
            position: Position::new(5, 15),
        },
    ]
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crabfield_sim=info".parse()?)
                .add_directive("crabfield_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let config = FieldConfig::from_env()?;
    info!(
        field_size = config.field_size,
        food_cap = config.food_cap,
        "Starting crabfield simulator"
    );

    let store = FieldStore::new(&config);
    store.replace_crabs(demo_roster());
    let simulators = SimulatorSet::start(store.clone(), &config);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut status = tokio::time::interval(Duration::from_secs(5));
    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = status.tick() => {
                store.read(|state| {
                    info!(
                        crabs = state.crabs().len(),
                        foods = state.foods().len(),
                        decoration = state.decoration().len(),
                        paint = state.paint().len(),
                        "field status"
                    );
                });
            }
        }
    }

    simulators.stop().await;
    info!("Shutdown complete");
    Ok(())
}
