// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Publishes the marketplace contract, then the course-token contract bound to it.

use std::{fmt, io::Write, path::PathBuf, process::ExitCode};

use alloy::primitives::Address;

use crate::{
    core::{
        artifact::{Artifact, Artifacts},
        deployment::{DeployedContract, DeploymentRequest, COURSE_CONTRACT, MARKETPLACE_CONTRACT},
        manifest::DeploymentManifest,
        network::Network,
    },
    utils::color::DebugColor,
    Error, Result,
};

#[derive(Clone, Debug, Default)]
pub struct DeployerConfig {
    pub artifacts: Artifacts,
    /// Where to write the deployment manifest after a full success.
    pub manifest: Option<PathBuf>,
}

/// Outcome of [`Deployer::run`], mapped to the process exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

#[derive(Clone, Copy, Debug)]
enum Stage {
    AwaitingMarketplace,
    AwaitingCourseContract { marketplace: Address },
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AwaitingMarketplace => write!(f, "awaiting {MARKETPLACE_CONTRACT}"),
            Self::AwaitingCourseContract { marketplace } => {
                write!(f, "awaiting {COURSE_CONTRACT} (market at {marketplace})")
            }
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Runs the two-step deployment against a [`Network`].
#[derive(Debug)]
pub struct Deployer<N> {
    network: N,
    config: DeployerConfig,
}

impl<N: Network> Deployer<N> {
    pub fn new(network: N, config: DeployerConfig) -> Self {
        Self { network, config }
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Deploys the marketplace contract, which takes no constructor arguments.
    pub async fn deploy_marketplace(&self) -> Result<DeployedContract> {
        let artifact = self.config.artifacts.load(MARKETPLACE_CONTRACT)?;
        self.deploy(&artifact, &marketplace_request()).await
    }

    /// Deploys the course-token contract bound to the marketplace at `marketplace_address`.
    ///
    /// The address is validated before anything is sent to the network.
    pub async fn deploy_course_contract(
        &self,
        marketplace_address: &str,
    ) -> Result<DeployedContract> {
        let marketplace = parse_address("marketplace_address", marketplace_address)?;
        let artifact = self.config.artifacts.load(COURSE_CONTRACT)?;
        self.deploy(&artifact, &course_request(marketplace)).await
    }

    async fn deploy(
        &self,
        artifact: &Artifact,
        request: &DeploymentRequest,
    ) -> Result<DeployedContract> {
        let initcode = artifact.initcode(request.constructor_args())?;
        info!(@grey, "deploying {}", request.contract_name());
        let deployed = self
            .network
            .deploy(request.contract_name(), initcode)
            .await?;
        Ok(deployed)
    }

    /// Deploys both contracts in order, writing one line to `out` per confirmed contract.
    ///
    /// Both artifacts are loaded and checked before the first transaction is sent.
    pub async fn deploy_all(&self, out: &mut impl Write) -> Result<DeploymentManifest> {
        let market_artifact = self.config.artifacts.load(MARKETPLACE_CONTRACT)?;
        let course_artifact = self.config.artifacts.load(COURSE_CONTRACT)?;
        market_artifact.initcode(marketplace_request().constructor_args())?;
        // placeholder until the marketplace address is known
        course_artifact.initcode(course_request(Address::ZERO).constructor_args())?;

        let mut manifest = DeploymentManifest::new(self.network.chain_id());
        let mut stage = Stage::AwaitingMarketplace;
        debug!(@grey, "stage: {}", stage);

        let marketplace = match self
            .deploy(&market_artifact, &marketplace_request())
            .await
        {
            Ok(marketplace) => marketplace,
            Err(err) => {
                debug!(@grey, "stage: {} -> {}", stage, Stage::Failed);
                return Err(err);
            }
        };
        manifest.push(marketplace.clone());
        if let Err(err) = report(out, &marketplace) {
            return Err(partial(stage, manifest, err));
        }

        stage = Stage::AwaitingCourseContract {
            marketplace: marketplace.address,
        };
        debug!(@grey, "stage: {}", stage);

        let course = match self
            .deploy(&course_artifact, &course_request(marketplace.address))
            .await
        {
            Ok(course) => course,
            Err(err) => return Err(partial(stage, manifest, err)),
        };
        manifest.push(course.clone());
        if let Err(err) = self.finish(out, &course, &manifest) {
            return Err(partial(stage, manifest, err));
        }

        debug!(@grey, "stage: {}", Stage::Done);
        Ok(manifest)
    }

    fn finish(
        &self,
        out: &mut impl Write,
        course: &DeployedContract,
        manifest: &DeploymentManifest,
    ) -> Result<()> {
        report(out, course)?;
        if let Some(path) = &self.config.manifest {
            manifest.write(path)?;
        }
        Ok(())
    }

    /// Deploys both contracts, reporting addresses to `out` and any error to `err`.
    pub async fn run(&self, out: &mut impl Write, err: &mut impl Write) -> ExitStatus {
        match self.deploy_all(out).await {
            Ok(_) => ExitStatus::Success,
            Err(error) => {
                // Nothing more can be done if the error stream itself is broken.
                let _ = writeln!(err, "error: {error}");
                ExitStatus::Failure
            }
        }
    }
}

fn marketplace_request() -> DeploymentRequest {
    DeploymentRequest::new(MARKETPLACE_CONTRACT, Vec::new())
}

fn course_request(marketplace: Address) -> DeploymentRequest {
    DeploymentRequest::new(COURSE_CONTRACT, vec![marketplace.to_string()])
}

/// Wraps a failure that happened after the contracts in `manifest` were confirmed.
fn partial(stage: Stage, manifest: DeploymentManifest, err: Error) -> Error {
    debug!(@grey, "stage: {} -> {}", stage, Stage::Failed);
    Error::PartialDeployment {
        deployed: manifest.contracts,
        source: Box::new(err),
    }
}

fn report(out: &mut impl Write, contract: &DeployedContract) -> Result<()> {
    writeln!(out, "{} deployed to: {}", contract.name, contract.address)?;
    debug!(@grey, "{} confirmed in tx {}", contract.name, contract.tx_hash.debug_lavender());
    Ok(())
}

fn parse_address(name: &'static str, text: &str) -> Result<Address> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidArgument {
            name,
            reason: "address is empty".to_string(),
        });
    }
    text.parse().map_err(|err| Error::InvalidArgument {
        name,
        reason: format!("{text:?} is not an address: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque, fs, path::Path};

    use alloy::primitives::{address, Bytes, TxHash};

    use super::*;
    use crate::core::{
        artifact::{
            tests::{write_artifact, COURSE_ARTIFACT, MARKET_ARTIFACT},
            ArtifactError,
        },
        deployment::DeploymentError,
    };

    const MARKET: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    const COURSE: Address = address!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

    /// Confirms or rejects deployments from a script, recording every call.
    #[derive(Default)]
    struct MockNetwork {
        script: RefCell<VecDeque<Option<Address>>>,
        calls: RefCell<Vec<(String, Bytes)>>,
    }

    impl MockNetwork {
        fn new(script: impl IntoIterator<Item = Option<Address>>) -> Self {
            Self {
                script: RefCell::new(script.into_iter().collect()),
                calls: RefCell::default(),
            }
        }

        fn calls(&self) -> Vec<(String, Bytes)> {
            self.calls.borrow().clone()
        }
    }

    impl Network for MockNetwork {
        fn chain_id(&self) -> u64 {
            31337
        }

        async fn deploy(
            &self,
            name: &str,
            initcode: Bytes,
        ) -> Result<DeployedContract, DeploymentError> {
            self.calls.borrow_mut().push((name.to_string(), initcode));
            match self.script.borrow_mut().pop_front().flatten() {
                Some(address) => Ok(DeployedContract::confirmed(name, address, TxHash::ZERO)),
                None => Err(DeploymentError::Reverted {
                    tx_hash: TxHash::ZERO,
                }),
            }
        }
    }

    fn artifacts_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), MARKETPLACE_CONTRACT, MARKET_ARTIFACT);
        write_artifact(dir.path(), COURSE_CONTRACT, COURSE_ARTIFACT);
        dir
    }

    fn deployer(dir: &Path, network: MockNetwork) -> Deployer<MockNetwork> {
        let config = DeployerConfig {
            artifacts: Artifacts::new(dir),
            manifest: None,
        };
        Deployer::new(network, config)
    }

    fn lines(buf: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(buf).lines().map(str::to_string).collect()
    }

    #[tokio::test]
    async fn deploys_both_in_order() {
        let dir = artifacts_dir();
        let deployer = deployer(dir.path(), MockNetwork::new([Some(MARKET), Some(COURSE)]));

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = deployer.run(&mut out, &mut err).await;

        assert_eq!(status, ExitStatus::Success);
        assert_eq!(status.code(), 0);
        assert_eq!(
            lines(&out),
            [
                format!("DSCHOOLMarket deployed to: {MARKET}"),
                format!("DSCHOOL deployed to: {COURSE}"),
            ]
        );
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn course_contract_receives_confirmed_market_address() {
        let dir = artifacts_dir();
        let deployer = deployer(dir.path(), MockNetwork::new([Some(MARKET), Some(COURSE)]));
        deployer.deploy_all(&mut Vec::new()).await.unwrap();

        let calls = deployer.network().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, MARKETPLACE_CONTRACT);
        assert_eq!(&calls[0].1[..], &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(calls[1].0, COURSE_CONTRACT);
        // The constructor argument is the last word of the initcode.
        assert_eq!(&calls[1].1[calls[1].1.len() - 20..], MARKET.as_slice());
    }

    #[tokio::test]
    async fn market_failure_stops_the_sequence() {
        let dir = artifacts_dir();
        let deployer = deployer(dir.path(), MockNetwork::new([None, Some(COURSE)]));

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = deployer.run(&mut out, &mut err).await;

        assert_eq!(status, ExitStatus::Failure);
        assert_eq!(status.code(), 1);
        assert!(out.is_empty());
        assert!(String::from_utf8_lossy(&err).contains("reverted"));
        assert_eq!(deployer.network().calls().len(), 1);
    }

    #[tokio::test]
    async fn course_failure_reports_partial_deployment() {
        let dir = artifacts_dir();
        let deployer = deployer(dir.path(), MockNetwork::new([Some(MARKET), None]));

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = deployer.run(&mut out, &mut err).await;

        assert_eq!(status, ExitStatus::Failure);
        assert_eq!(lines(&out), [format!("DSCHOOLMarket deployed to: {MARKET}")]);
        let err = String::from_utf8_lossy(&err);
        assert!(err.contains("DSCHOOLMarket was already deployed"));
        assert!(err.contains(&MARKET.to_string()));

        let result = deployer.deploy_all(&mut Vec::new()).await;
        // The script is exhausted, so the marketplace now fails too.
        assert!(result.unwrap_err().deployed().is_empty());
    }

    #[tokio::test]
    async fn partial_deployment_names_the_market() {
        let dir = artifacts_dir();
        let deployer = deployer(dir.path(), MockNetwork::new([Some(MARKET), None]));

        let err = deployer.deploy_all(&mut Vec::new()).await.unwrap_err();
        let [deployed] = err.deployed() else {
            panic!("expected only the market on chain: {err}");
        };
        assert_eq!(deployed.name, MARKETPLACE_CONTRACT);
        assert_eq!(deployed.address, MARKET);
    }

    #[tokio::test]
    async fn invalid_market_address_never_reaches_network() {
        let dir = artifacts_dir();
        let deployer = deployer(dir.path(), MockNetwork::new([Some(COURSE)]));

        for address in ["", "   ", "0x1234", "not-an-address"] {
            let err = deployer.deploy_course_contract(address).await.unwrap_err();
            assert!(
                matches!(err, Error::InvalidArgument { .. }),
                "{address:?}: {err}"
            );
        }
        assert!(deployer.network().calls().is_empty());

        let course = deployer
            .deploy_course_contract(&MARKET.to_string())
            .await
            .unwrap();
        assert_eq!(course.address, COURSE);
        assert!(course.confirmed);
    }

    #[tokio::test]
    async fn missing_artifact_never_reaches_network() {
        let dir = tempfile::tempdir().unwrap();
        let deployer = deployer(dir.path(), MockNetwork::new([Some(MARKET)]));

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = deployer.run(&mut out, &mut err).await;

        assert_eq!(status, ExitStatus::Failure);
        assert!(out.is_empty());
        assert!(String::from_utf8_lossy(&err).contains("artifact not found"));
        assert!(deployer.network().calls().is_empty());

        let err = deployer.deploy_marketplace().await.unwrap_err();
        assert!(matches!(err, Error::Artifact(ArtifactError::Missing { .. })));
    }

    #[tokio::test]
    async fn writes_manifest_on_success() {
        let dir = artifacts_dir();
        let path = dir.path().join("deployments.json");
        let config = DeployerConfig {
            artifacts: Artifacts::new(dir.path()),
            manifest: Some(path.clone()),
        };
        let deployer = Deployer::new(MockNetwork::new([Some(MARKET), Some(COURSE)]), config);

        let status = deployer.run(&mut Vec::new(), &mut Vec::new()).await;
        assert_eq!(status, ExitStatus::Success);

        let manifest = DeploymentManifest::read(&path).unwrap();
        assert_eq!(manifest.chain_id, 31337);
        assert_eq!(manifest.address_of(MARKETPLACE_CONTRACT), Some(MARKET));
        assert_eq!(manifest.address_of(COURSE_CONTRACT), Some(COURSE));
    }

    #[tokio::test]
    async fn missing_course_artifact_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), MARKETPLACE_CONTRACT, MARKET_ARTIFACT);
        let deployer = deployer(dir.path(), MockNetwork::new([Some(MARKET), Some(COURSE)]));

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = deployer.run(&mut out, &mut err).await;

        assert_eq!(status, ExitStatus::Failure);
        assert!(out.is_empty());
        let err = String::from_utf8_lossy(&err);
        assert!(err.contains("artifact not found"));
        assert!(!err.contains("already deployed"));
        assert!(deployer.network().calls().is_empty());
    }

    #[tokio::test]
    async fn manifest_failure_names_both_contracts() {
        let dir = artifacts_dir();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let config = DeployerConfig {
            artifacts: Artifacts::new(dir.path()),
            manifest: Some(blocker.join("deployments.json")),
        };
        let deployer = Deployer::new(MockNetwork::new([Some(MARKET), Some(COURSE)]), config);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = deployer.run(&mut out, &mut err).await;

        assert_eq!(status, ExitStatus::Failure);
        assert_eq!(lines(&out).len(), 2);
        let err = String::from_utf8_lossy(&err);
        assert!(err.contains(&format!("DSCHOOLMarket was already deployed to {MARKET}")));
        assert!(err.contains(&format!("DSCHOOL was already deployed to {COURSE}")));
    }
}
