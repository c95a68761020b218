// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Record of a completed deployment, read by the marketplace front-end.

use std::{fs, path::Path};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{core::deployment::DeployedContract, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentManifest {
    pub chain_id: u64,
    pub contracts: Vec<DeployedContract>,
}

impl DeploymentManifest {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            contracts: Vec::new(),
        }
    }

    pub fn push(&mut self, contract: DeployedContract) {
        self.contracts.push(contract);
    }

    pub fn address_of(&self, name: &str) -> Option<Address> {
        self.contracts
            .iter()
            .find(|contract| contract.name == name)
            .map(|contract| contract.address)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the manifest as pretty-printed JSON, creating parent directories as needed.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json)?;
        info!(@grey, "wrote deployment manifest to {}", path.display());
        Ok(())
    }
}
