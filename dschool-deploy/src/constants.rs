// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub use dschool_tools::core::network::DEFAULT_ENDPOINT;

/// Environment variable holding the RPC endpoint.
pub const ENDPOINT_ENV: &str = "DSCHOOL_RPC_URL";

/// Environment variable holding the hex-encoded private key.
pub const PRIVATE_KEY_ENV: &str = "DSCHOOL_PRIVATE_KEY";
