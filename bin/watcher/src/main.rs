//! Upkeep Watcher — polls EventEmitter logs and runs the upkeep decision engine.
//!
//! Flow:
//! 1. Connect to the RPC endpoint
//! 2. Poll blocks in batches, fetch all logs from the emitter address
//! 3. Classify each log and run the engine's check step
//! 4. Forward the encoded perform data of triggered decisions into the
//!    perform step (this process plays the automation relay locally)
//!
//! The inspector API exposes the live counters and the recent upkeep
//! records over HTTP.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::{primitives::Address, providers::Provider, rpc::types::Filter};
use axum::{Json, Router, extract::State, routing::get};
use eyre::Result;
use serde::Serialize;
use upkeep_core::{AppError, Settings, telemetry};
use upkeep_engine::{
    UpkeepEngine, UpkeepRecord, classify_log, provider::RpcProvider, signature_name,
};

/// How many performed upkeeps the inspector API keeps in memory.
const UPKEEP_HISTORY: usize = 256;

/// Shared application state: the engine behind its single-writer lock,
/// plus the recent upkeep records for inspection.
struct AppState {
    engine: Mutex<UpkeepEngine>,
    upkeeps: Mutex<Vec<UpkeepRecord>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ── Initialisation ──────────────────────────────────────────────────
    telemetry::init();
    let settings = Settings::from_env()?;

    tracing::info!(rpc = %settings.rpc_url, "Starting Upkeep Watcher");

    let emitter: Address = settings.emitter_address.parse().map_err(|_| {
        eyre::eyre!(
            "EMITTER_ADDRESS is not a valid address: {:?}",
            settings.emitter_address
        )
    })?;

    let provider = upkeep_engine::create_provider(&settings.rpc_url)?;
    tracing::info!("Connected to RPC");

    let state = Arc::new(AppState {
        engine: Mutex::new(UpkeepEngine::new()),
        upkeeps: Mutex::new(Vec::new()),
    });

    // ── Inspector API ───────────────────────────────────────────────────
    let app = Router::new()
        .route("/counters", get(get_counters))
        .route("/upkeeps", get(get_upkeeps))
        .route("/health", get(health))
        .with_state(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.api_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Inspector API listening on http://{addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Inspector API stopped");
        }
    });

    // ── Main Watch Loop ─────────────────────────────────────────────────
    let mut next_block = settings.start_block;
    tracing::info!(from_block = next_block, "Starting watch loop");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutting down gracefully…");
                break;
            }
            result = watch_next_batch(&provider, &state, emitter, &mut next_block, &settings) => {
                match result {
                    Ok(scanned) => {
                        if !scanned {
                            // Caught up — wait before polling again
                            tokio::time::sleep(std::time::Duration::from_secs(
                                settings.poll_interval_secs,
                            ))
                            .await;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Watch error, retrying in 5s…");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    }
                }
            }
        }
    }

    tracing::info!("Watcher stopped.");
    Ok(())
}

/// Scan the next batch of blocks. Returns `Ok(true)` if work was done,
/// `Ok(false)` if caught up with the chain head.
async fn watch_next_batch(
    provider: &RpcProvider,
    state: &Arc<AppState>,
    emitter: Address,
    next_block: &mut u64,
    settings: &Settings,
) -> Result<bool> {
    let chain_head = provider.get_block_number().await?;

    if *next_block > chain_head {
        return Ok(false); // Caught up
    }

    let to = std::cmp::min(*next_block + settings.batch_size - 1, chain_head);
    tracing::info!(from = *next_block, to = to, head = chain_head, "Scanning batch");

    // No signature prefilter: logs with unrecognised topics must still
    // reach the engine so they fold into its Unknown branch.
    let filter = Filter::new()
        .address(emitter)
        .from_block(*next_block)
        .to_block(to);

    let logs = provider.get_logs(&filter).await?;

    for log in &logs {
        let record = classify_log(log);
        let decision = state
            .engine
            .lock()
            .expect("engine lock poisoned")
            .evaluate(&record);

        let Some(data) = decision.perform_data() else {
            continue;
        };
        tracing::debug!(data = %hex::encode(&data), "Forwarding perform data");

        // Local relay: hand the encoded decision straight back into the
        // perform step, one shot, no retries.
        let performed = state
            .engine
            .lock()
            .expect("engine lock poisoned")
            .act(&data);

        match performed {
            Ok(rec) => {
                tracing::info!(
                    upkeep = %rec.sequence_number,
                    by = %rec.actor,
                    sig = signature_name(&rec.signature),
                    block = log.block_number.unwrap_or_default(),
                    "New upkeep performed"
                );

                let mut upkeeps = state.upkeeps.lock().expect("upkeeps lock poisoned");
                upkeeps.push(rec);
                if upkeeps.len() > UPKEEP_HISTORY {
                    upkeeps.remove(0);
                }
            }
            Err(err) => {
                tracing::warn!(error = %AppError::from(err), "Upkeep rejected");
            }
        }
    }

    *next_block = to + 1;
    Ok(true)
}

// ─── Inspector handlers ─────────────────────────────────────────────────

#[derive(Serialize)]
struct CountersResponse {
    deposit_count: String,
    withdraw_count: String,
    off_chain_checks: String,
    on_chain_actions: String,
}

async fn get_counters(State(state): State<Arc<AppState>>) -> Json<CountersResponse> {
    let counters = state
        .engine
        .lock()
        .expect("engine lock poisoned")
        .counters();

    Json(CountersResponse {
        deposit_count: counters.deposit_count.to_string(),
        withdraw_count: counters.withdraw_count.to_string(),
        off_chain_checks: counters.off_chain_checks.to_string(),
        on_chain_actions: counters.on_chain_actions.to_string(),
    })
}

#[derive(Serialize)]
struct UpkeepResponse {
    actor: String,
    signature: String,
    sequence_number: String,
}

async fn get_upkeeps(State(state): State<Arc<AppState>>) -> Json<Vec<UpkeepResponse>> {
    let upkeeps = state.upkeeps.lock().expect("upkeeps lock poisoned");

    Json(
        upkeeps
            .iter()
            .map(|rec| UpkeepResponse {
                actor: format!("{:#x}", rec.actor),
                signature: format!("{:#x}", rec.signature),
                sequence_number: rec.sequence_number.to_string(),
            })
            .collect(),
    )
}

async fn health() -> &'static str {
    "ok"
}
