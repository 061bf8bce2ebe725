use alloy::providers::{DynProvider, Provider, ProviderBuilder};

/// The type-erased RPC provider used throughout the application.
pub type RpcProvider = DynProvider;

/// Create an HTTP provider from an RPC URL string.
pub fn create_provider(rpc_url: &str) -> eyre::Result<RpcProvider> {
    let url = rpc_url.parse()?;
    let provider = ProviderBuilder::new().connect_http(url);
    Ok(provider.erased())
}
