// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{fs, path::PathBuf};

use alloy::{
    primitives::B256,
    signers::local::{LocalSigner, PrivateKeySigner},
};
use dschool_tools::{
    core::{artifact::DEFAULT_ARTIFACTS_DIR, network::NetworkConfig},
    utils::{convert_gwei_to_wei, FeeError},
};
use eyre::{eyre, Context};

use crate::{
    constants::{DEFAULT_ENDPOINT, ENDPOINT_ENV, PRIVATE_KEY_ENV},
    utils::decode0x,
};

#[derive(Debug, clap::Args)]
pub struct AuthArgs {
    /// File path to a text file containing a hex-encoded private key
    #[arg(long)]
    private_key_path: Option<PathBuf>,
    /// Private key as a hex string. Warning: this exposes your key to shell history
    #[arg(long, env = PRIVATE_KEY_ENV, hide_env_values = true)]
    private_key: Option<String>,
    /// Path to an Ethereum wallet keystore file (e.g. clef)
    #[arg(long)]
    keystore_path: Option<String>,
    /// Keystore password file
    #[arg(long)]
    keystore_password_path: Option<PathBuf>,
    /// Optional max fee per gas in gwei units.
    #[arg(long, allow_hyphen_values = true)]
    max_fee_per_gas_gwei: Option<String>,
}

impl AuthArgs {
    /// Builds the signer from the first wallet source given.
    pub fn build_signer(&self) -> eyre::Result<PrivateKeySigner> {
        if let Some(key) = &self.private_key {
            if key.is_empty() {
                return Err(eyre!("empty private key"));
            }
            return signer_from_hex(key);
        }

        if let Some(file) = &self.private_key_path {
            let key = fs::read_to_string(file).wrap_err("could not open private key file")?;
            return signer_from_hex(&key);
        }

        let keystore = self.keystore_path.as_ref().ok_or(eyre!(
            "no wallet given: pass --private-key, --private-key-path or --keystore-path"
        ))?;
        let password = self
            .keystore_password_path
            .as_ref()
            .map(fs::read_to_string)
            .unwrap_or(Ok("".into()))?;

        Ok(LocalSigner::decrypt_keystore(keystore, password)?)
    }

    pub fn get_max_fee_per_gas_wei(&self) -> Result<Option<u128>, FeeError> {
        self.max_fee_per_gas_gwei
            .as_ref()
            .map(|fee_str| convert_gwei_to_wei(fee_str))
            .transpose()
    }
}

fn signer_from_hex(key: &str) -> eyre::Result<PrivateKeySigner> {
    let bytes = decode0x(key).wrap_err("private key is not valid hex")?;
    let priv_key_bytes = B256::try_from(bytes.as_slice())
        .map_err(|_| eyre!("private key must be 32 bytes, got {}", bytes.len()))?;
    Ok(PrivateKeySigner::from_bytes(&priv_key_bytes)?)
}

#[derive(Debug, clap::Args)]
pub struct ProviderArgs {
    /// RPC endpoint of the chain to deploy to
    #[arg(short, long, env = ENDPOINT_ENV, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
    /// Number of blocks to wait for before a deployment counts as confirmed
    #[arg(long, default_value_t = 1)]
    pub confirmations: u64,
}

impl ProviderArgs {
    pub fn config(&self, auth: &AuthArgs) -> eyre::Result<NetworkConfig> {
        let mut config = NetworkConfig::new(&self.endpoint, auth.build_signer()?);
        config.max_fee_per_gas_wei = auth.get_max_fee_per_gas_wei()?;
        config.confirmations = self.confirmations;
        Ok(config)
    }
}

#[derive(Debug, clap::Args)]
pub struct OutputArgs {
    /// Directory holding the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,
    /// Write the deployed addresses as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
