// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Contract-creation transactions.

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, U256},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
};

use super::DeploymentError;
use crate::utils::{color::DebugColor, format_wei};

/// Contract-creation transaction for a single contract
#[derive(Debug)]
pub struct DeploymentTx {
    contract: String,
    sender: Address,
    tx: TransactionRequest,
    max_fee_per_gas_wei: Option<u128>,
}

impl DeploymentTx {
    pub fn new(
        contract: impl Into<String>,
        sender: Address,
        initcode: Bytes,
        max_fee_per_gas_wei: Option<u128>,
    ) -> Self {
        Self {
            contract: contract.into(),
            sender,
            tx: TransactionRequest::default()
                .with_from(sender)
                .with_deploy_code(initcode),
            max_fee_per_gas_wei,
        }
    }

    pub async fn estimate_gas(&self, provider: &impl Provider) -> Result<u64, DeploymentError> {
        Ok(provider.estimate_gas(self.tx.clone()).await?)
    }

    /// Sends the transaction and waits for `confirmations` blocks on top of its inclusion.
    pub async fn exec(
        self,
        provider: &impl Provider,
        confirmations: u64,
    ) -> Result<TransactionReceipt, DeploymentError> {
        let gas = self.estimate_gas(provider).await?;
        let max_fee_per_gas = self.fee_per_gas(provider).await?;
        debug!(@grey, "estimated gas for {}: {} at {} wei", self.contract, gas, max_fee_per_gas);

        // check balance early
        let required = U256::from(gas) * U256::from(max_fee_per_gas);
        debug!(@grey, "max deployment cost for {}: {}", self.contract, format_wei(required));
        let balance = provider
            .get_balance(self.sender)
            .await
            .map_err(DeploymentError::FailedToGetBalance)?;
        if balance < required {
            return Err(DeploymentError::NotEnoughFunds {
                contract: self.contract,
                from_address: self.sender,
                balance,
                required,
            });
        }

        let mut tx = self.tx;
        tx.gas = Some(gas);
        tx.max_fee_per_gas = Some(max_fee_per_gas);
        tx.max_priority_fee_per_gas = Some(0);

        let tx = provider.send_transaction(tx).await?;
        let tx_hash = *tx.tx_hash();
        debug!(@grey, "sent deploy tx for {}: {}", self.contract, tx_hash.debug_lavender());

        let receipt = tx
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await
            .or(Err(DeploymentError::FailedToComplete))?;
        if !receipt.status() {
            return Err(DeploymentError::Reverted { tx_hash });
        }

        Ok(receipt)
    }

    async fn fee_per_gas(&self, provider: &impl Provider) -> Result<u128, DeploymentError> {
        match self.max_fee_per_gas_wei {
            Some(wei) => Ok(wei),
            None => Ok(provider.get_gas_price().await?),
        }
    }
}
