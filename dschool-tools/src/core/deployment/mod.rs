// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Contract deployment requests and their confirmed results.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

use crate::utils::color::{Color, DebugColor};

pub mod request;

/// Name of the marketplace contract, as compiled.
pub const MARKETPLACE_CONTRACT: &str = "DSCHOOLMarket";
/// Name of the course-token contract, as compiled.
pub const COURSE_CONTRACT: &str = "DSCHOOL";

/// A contract to deploy, with the textual form of its constructor arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRequest {
    contract_name: String,
    constructor_args: Vec<String>,
}

impl DeploymentRequest {
    pub fn new(contract_name: impl Into<String>, constructor_args: Vec<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
            constructor_args,
        }
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn constructor_args(&self) -> &[String] {
        &self.constructor_args
    }
}

/// A contract the network has confirmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedContract {
    pub name: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub confirmed: bool,
}

impl DeployedContract {
    pub fn confirmed(name: impl Into<String>, address: Address, tx_hash: TxHash) -> Self {
        Self {
            name: name.into(),
            address,
            tx_hash,
            confirmed: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("rpc error: {0}")]
    Rpc(#[from] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),

    #[error("tx failed to complete")]
    FailedToComplete,
    #[error("failed to get balance: {0}")]
    FailedToGetBalance(#[source] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),
    #[error(
        "not enough funds in account {} to deploy {}\nbalance {} < {}",
        .from_address.red(),
        .contract,
        .balance.red(),
        format!("{} wei", .required).red(),
    )]
    NotEnoughFunds {
        contract: String,
        from_address: Address,
        balance: U256,
        required: U256,
    },
    #[error("deploy tx reverted {}", .tx_hash.debug_red())]
    Reverted { tx_hash: TxHash },
    #[error("missing contract address in receipt of {}", .tx_hash.debug_red())]
    MissingReceiptAddress { tx_hash: TxHash },
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use alloy::{
        primitives::{address, b256},
        transports::TransportErrorKind,
    };

    use super::*;

    #[test]
    fn request_keeps_argument_order() {
        let req = DeploymentRequest::new(COURSE_CONTRACT, vec!["a".into(), "b".into()]);
        assert_eq!(req.contract_name(), "DSCHOOL");
        assert_eq!(req.constructor_args(), ["a", "b"]);
    }

    #[test]
    fn deployed_contract_json() {
        let contract = DeployedContract::confirmed(
            MARKETPLACE_CONTRACT,
            address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            b256!("0x0101010101010101010101010101010101010101010101010101010101010101"),
        );
        let json = serde_json::to_value(&contract).unwrap();
        assert_eq!(json["name"], "DSCHOOLMarket");
        let address: Address = json["address"].as_str().unwrap().parse().unwrap();
        assert_eq!(address, contract.address);
        assert_eq!(json["confirmed"], true);
        assert!(json.get("txHash").is_some());

        let back: DeployedContract = serde_json::from_value(json).unwrap();
        assert_eq!(back, contract);
    }

    #[test]
    fn balance_error_keeps_rpc_cause() {
        let err = DeploymentError::FailedToGetBalance(TransportErrorKind::custom_str(
            "connection refused",
        ));
        assert!(err.to_string().starts_with("failed to get balance: "));
        assert!(err.to_string().contains("connection refused"));
        assert!(err.source().is_some());
    }
}
