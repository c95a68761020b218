// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Access to the chain the contracts are deployed to.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes},
    providers::{Provider, ProviderBuilder, WalletProvider},
    signers::{local::PrivateKeySigner, Signer},
};

use crate::{
    core::deployment::{request::DeploymentTx, DeployedContract, DeploymentError},
    utils::color::{Color, DebugColor},
};

/// The default endpoint, a local development node.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8545";

/// Connection settings and signer identity used for every deployment of a run.
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    pub endpoint: String,
    pub signer: PrivateKeySigner,
    pub max_fee_per_gas_wei: Option<u128>,
    pub confirmations: u64,
}

impl NetworkConfig {
    pub fn new(endpoint: impl Into<String>, signer: PrivateKeySigner) -> Self {
        Self {
            endpoint: endpoint.into(),
            signer,
            max_fee_per_gas_wei: None,
            confirmations: 1,
        }
    }
}

/// Submits contract-creation code and waits until the chain confirms it.
pub trait Network {
    /// Chain the contracts land on.
    fn chain_id(&self) -> u64;

    /// Deploys `initcode` (creation code plus encoded constructor arguments) as contract `name`.
    #[allow(async_fn_in_trait)]
    async fn deploy(&self, name: &str, initcode: Bytes)
        -> Result<DeployedContract, DeploymentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("rpc error: {0}")]
    Rpc(#[from] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),
    #[error("unsupported endpoint {}: expected an http(s) url", .0.red())]
    UnsupportedEndpoint(String),
}

pub fn check_endpoint(endpoint: &str) -> Result<(), NetworkError> {
    const SCHEMES: [&str; 2] = ["http://", "https://"];
    if SCHEMES.iter().any(|scheme| endpoint.starts_with(scheme)) {
        Ok(())
    } else {
        Err(NetworkError::UnsupportedEndpoint(endpoint.to_string()))
    }
}

/// Connects to the configured endpoint with a wallet holding the configured signer.
pub async fn connect(
    config: NetworkConfig,
) -> Result<RpcNetwork<impl Provider + WalletProvider>, NetworkError> {
    check_endpoint(&config.endpoint)?;
    let chain_id = ProviderBuilder::new()
        .connect(&config.endpoint)
        .await?
        .get_chain_id()
        .await?;
    debug!(@grey, "connected to chain {} at {}", chain_id, config.endpoint);

    let signer = config.signer.clone().with_chain_id(Some(chain_id));
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::new(signer))
        .connect(&config.endpoint)
        .await?;
    Ok(RpcNetwork::new(provider, chain_id, &config))
}

/// [`Network`] backed by an RPC provider with a wallet.
#[derive(Debug)]
pub struct RpcNetwork<P> {
    provider: P,
    chain_id: u64,
    max_fee_per_gas_wei: Option<u128>,
    confirmations: u64,
}

impl<P: Provider + WalletProvider> RpcNetwork<P> {
    pub fn new(provider: P, chain_id: u64, config: &NetworkConfig) -> Self {
        if config.confirmations == 0 {
            warn!(@yellow, "zero confirmations requested, waiting for inclusion only");
        }
        Self {
            provider,
            chain_id,
            max_fee_per_gas_wei: config.max_fee_per_gas_wei,
            confirmations: config.confirmations.max(1),
        }
    }

    pub fn sender(&self) -> Address {
        self.provider.default_signer_address()
    }
}

impl<P: Provider + WalletProvider> Network for RpcNetwork<P> {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn deploy(
        &self,
        name: &str,
        initcode: Bytes,
    ) -> Result<DeployedContract, DeploymentError> {
        let sender = self.sender();
        debug!(@grey, "sender address: {}", sender.debug_lavender());

        let receipt = DeploymentTx::new(name, sender, initcode, self.max_fee_per_gas_wei)
            .exec(&self.provider, self.confirmations)
            .await?;
        let tx_hash = receipt.transaction_hash;
        let address = receipt
            .contract_address
            .ok_or(DeploymentError::MissingReceiptAddress { tx_hash })?;
        debug!(@grey, "gas used by {}: {}", name, receipt.gas_used);
        debug!(@grey, "deployment tx hash: {}", tx_hash.debug_lavender());
        Ok(DeployedContract::confirmed(name, address, tx_hash))
    }
}
