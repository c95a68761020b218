// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! General purpose utilities.

use alloy::primitives::U256;

use color::Color;

pub mod color;

/// Wei per gwei.
const GWEI: f64 = 1e9;

/// Parses a decimal gwei amount into wei.
pub fn convert_gwei_to_wei(fee_str: &str) -> Result<u128, FeeError> {
    let gwei = match fee_str.trim().parse::<f64>() {
        Ok(fee) if !fee.is_finite() => return Err(FeeError::NotFinite),
        Ok(fee) if fee >= 0.0 => fee,
        Ok(_) => return Err(FeeError::Negative),
        Err(_) => return Err(FeeError::Invalid(fee_str.to_string())),
    };

    let wei = gwei * GWEI;
    if !wei.is_finite() || wei >= u128::MAX as f64 {
        return Err(FeeError::OutOfRange);
    }

    Ok(wei as u128)
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FeeError {
    #[error("max fee per gas must be non-negative")]
    Negative,
    #[error("invalid max fee per gas value: {0}")]
    Invalid(String),
    #[error("invalid gwei value: must be finite")]
    NotFinite,
    #[error("max fee per gas is outside the valid range for wei")]
    OutOfRange,
}

/// Pretty-prints a wei amount in ETH.
pub fn format_wei(wei: U256) -> String {
    let Ok(gwei): Result<u64, _> = (wei / U256::from(GWEI as u64)).try_into() else {
        return "???".red();
    };
    let eth = gwei as f64 / GWEI;
    format!("{eth:.6} ETH").mint()
}
