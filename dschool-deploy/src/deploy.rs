// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::io;

use dschool_tools::{
    core::{
        artifact::Artifacts,
        network::{self, Network},
    },
    Deployer, DeployerConfig, ExitStatus,
};

use crate::{
    common_args::{AuthArgs, OutputArgs, ProviderArgs},
    error::DeployCliResult,
};

#[derive(Debug, clap::Args)]
pub struct DeployArgs {
    /// Wallet source to use.
    #[command(flatten)]
    auth: AuthArgs,
    #[command(flatten)]
    provider: ProviderArgs,
    #[command(flatten)]
    output: OutputArgs,
}

/// Deploys the marketplace, then the course-token contract bound to it.
///
/// Errors before the first deployment is sent are returned; errors during the sequence are
/// reported by the deployer itself and turned into a failure status.
pub async fn exec(args: DeployArgs) -> DeployCliResult<ExitStatus> {
    let config = args.provider.config(&args.auth)?;
    log::debug!("deploying as {} to {}", config.signer.address(), config.endpoint);

    let network = network::connect(config).await?;
    let deployer = Deployer::new(
        network,
        DeployerConfig {
            artifacts: Artifacts::new(args.output.artifacts),
            manifest: args.output.output,
        },
    );

    Ok(run_on_stdio(&deployer).await)
}

/// Runs the deployer against the process's standard streams.
///
/// The streams stay unlocked: log records from runtime workers write to stderr while the
/// deployment is awaited.
async fn run_on_stdio<N: Network>(deployer: &Deployer<N>) -> ExitStatus {
    deployer.run(&mut io::stdout(), &mut io::stderr()).await
}
