//! Event Emitter driver — periodically submits deposit()/withdraw()
//! transactions to the EventEmitter contract so the watcher pipeline has
//! traffic to chew on. Alternates kinds, waits for each receipt.

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use eyre::Result;
use upkeep_core::{Settings, telemetry};
use upkeep_engine::EventEmitter;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let settings = Settings::from_env()?;

    let emitter_address: Address = settings.emitter_address.parse().map_err(|_| {
        eyre::eyre!(
            "EMITTER_ADDRESS is not a valid address: {:?}",
            settings.emitter_address
        )
    })?;

    if settings.private_key.is_empty() {
        eyre::bail!("PRIVATE_KEY must be set to sign emitter transactions");
    }
    let signer: PrivateKeySigner = settings.private_key.parse()?;
    let wallet = EthereumWallet::from(signer);

    let url = settings.rpc_url.parse()?;
    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);
    let emitter = EventEmitter::new(emitter_address, provider);

    tracing::info!(
        emitter = %emitter_address,
        interval_secs = settings.poll_interval_secs,
        "Starting emitter loop"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut deposit_next = true;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutting down gracefully…");
                break;
            }
            result = send_next(&emitter, deposit_next) => {
                match result {
                    Ok(block) => {
                        tracing::info!(
                            block,
                            kind = if deposit_next { "deposit" } else { "withdraw" },
                            "Transaction mined"
                        );
                        deposit_next = !deposit_next;
                    }
                    Err(e) => tracing::error!(error = %e, "Send failed, retrying…"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(
                    settings.poll_interval_secs,
                ))
                .await;
            }
        }
    }

    tracing::info!("Emitter stopped.");
    Ok(())
}

/// Submit the next transaction and wait for its receipt. Returns the
/// block number the transaction landed in.
async fn send_next<P: Provider>(
    emitter: &EventEmitter::EventEmitterInstance<P>,
    deposit: bool,
) -> Result<u64> {
    let pending = if deposit {
        emitter.deposit().send().await?
    } else {
        emitter.withdraw().send().await?
    };

    let receipt = pending.get_receipt().await?;
    Ok(receipt.block_number.unwrap_or_default())
}
