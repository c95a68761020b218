// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Tools for deploying the DSCHOOL course marketplace contracts.

#[macro_use]
mod macros;

pub mod core;
pub(crate) mod error;

pub mod utils;

pub use crate::core::deployer::{Deployer, DeployerConfig, ExitStatus};
pub use error::{Error, Result};
