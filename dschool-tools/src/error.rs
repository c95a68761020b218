// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::core::{
    artifact::ArtifactError,
    deployment::{DeployedContract, DeploymentError},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Deployment(#[from] DeploymentError),
    #[error("compilation artifact error: {0}")]
    Artifact(#[from] ArtifactError),
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Some contracts of the sequence are already on chain when a later step fails.
    ///
    /// Deployments cannot be undone, so the confirmed contracts are reported alongside the cause.
    #[error("{source}{}", already_deployed(.deployed))]
    PartialDeployment {
        deployed: Vec<DeployedContract>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Contracts confirmed on chain before this error occurred.
    pub fn deployed(&self) -> &[DeployedContract] {
        match self {
            Self::PartialDeployment { deployed, .. } => deployed,
            _ => &[],
        }
    }
}

fn already_deployed(deployed: &[DeployedContract]) -> String {
    deployed
        .iter()
        .map(|contract| {
            format!(
                "\nnote: {} was already deployed to {} and has not been rolled back",
                contract.name, contract.address
            )
        })
        .collect()
}
