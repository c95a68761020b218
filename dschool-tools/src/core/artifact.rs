// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Compiled contract artifacts in the Hardhat layout.
//!
//! The compiler toolchain writes one JSON file per contract to
//! `<root>/contracts/<Name>.sol/<Name>.json`, holding the contract's ABI and creation code.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
    json_abi::JsonAbi,
    primitives::Bytes,
};
use serde::Deserialize;

/// Default directory the compiler toolchain writes artifacts to.
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Directory of compiled contract artifacts.
#[derive(Clone, Debug)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact for the contract `name`.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root
            .join("contracts")
            .join(format!("{name}.sol"))
            .join(format!("{name}.json"))
    }

    /// Reads and validates the artifact for the contract `name`.
    pub fn load(&self, name: &str) -> Result<Artifact, ArtifactError> {
        let path = self.path(name);
        if !path.is_file() {
            return Err(ArtifactError::Missing { path });
        }
        let text = fs::read_to_string(&path)?;
        let raw: RawArtifact =
            serde_json::from_str(&text).map_err(|source| ArtifactError::Json {
                path: path.clone(),
                source,
            })?;
        if raw.contract_name != name {
            return Err(ArtifactError::NameMismatch {
                expected: name.to_string(),
                found: raw.contract_name,
            });
        }
        let bytecode = decode_bytecode(name, &raw.bytecode)?;
        debug!(@grey, "loaded artifact {} ({} bytes of creation code)", path.display(), bytecode.len());
        Ok(Artifact {
            name: raw.contract_name,
            abi: raw.abi,
            bytecode,
        })
    }
}

impl Default for Artifacts {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACTS_DIR)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: String,
    abi: JsonAbi,
    bytecode: String,
}

/// A compiled contract, ready to be deployed.
#[derive(Clone, Debug)]
pub struct Artifact {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl Artifact {
    /// Creation code followed by the ABI-encoded constructor arguments.
    ///
    /// Each argument is given in its textual form and coerced to the type declared by the
    /// constructor.
    pub fn initcode(&self, args: &[String]) -> Result<Bytes, ArtifactError> {
        let encoded_args = match self.abi.constructor() {
            None if args.is_empty() => Vec::new(),
            None => {
                return Err(ArtifactError::ConstructorArgs(format!(
                    "{} has no constructor but {} arguments were given",
                    self.name,
                    args.len()
                )))
            }
            Some(constructor) => {
                if args.len() != constructor.inputs.len() {
                    return Err(ArtifactError::ConstructorArgs(format!(
                        "mismatch number of constructor arguments for {} (want {}; got {})",
                        self.name,
                        constructor.inputs.len(),
                        args.len(),
                    )));
                }
                let mut values = Vec::<DynSolValue>::with_capacity(args.len());
                for (arg, param) in args.iter().zip(constructor.inputs.iter()) {
                    let ty = param.resolve().map_err(|err| {
                        ArtifactError::ConstructorArgs(format!(
                            "could not resolve constructor arg {param}: {err}"
                        ))
                    })?;
                    let value = ty.coerce_str(arg).map_err(|err| {
                        ArtifactError::ConstructorArgs(format!(
                            "could not parse constructor arg {param} from {arg:?}: {err}"
                        ))
                    })?;
                    values.push(value);
                }
                constructor
                    .abi_encode_input(&values)
                    .map_err(|err| ArtifactError::ConstructorArgs(err.to_string()))?
            }
        };

        let mut initcode = Vec::with_capacity(self.bytecode.len() + encoded_args.len());
        initcode.extend_from_slice(&self.bytecode);
        initcode.extend(encoded_args);
        Ok(initcode.into())
    }
}

fn decode_bytecode(name: &str, text: &str) -> Result<Bytes, ArtifactError> {
    let hex_text = text.trim();
    let hex_text = hex_text.strip_prefix("0x").unwrap_or(hex_text);
    if hex_text.is_empty() {
        return Err(ArtifactError::EmptyBytecode(name.to_string()));
    }
    // Unlinked library references are left as `__$<hash>$__` placeholders.
    if hex_text.contains("__") {
        return Err(ArtifactError::InvalidBytecode {
            name: name.to_string(),
            reason: "contains unlinked library references".to_string(),
        });
    }
    hex::decode(hex_text)
        .map(Into::into)
        .map_err(|err| ArtifactError::InvalidBytecode {
            name: name.to_string(),
            reason: err.to_string(),
        })
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact not found at {}; compile the contracts first", .path.display())]
    Missing { path: PathBuf },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed artifact {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("artifact is for contract {found}, expected {expected}")]
    NameMismatch { expected: String, found: String },
    #[error("artifact for {0} has no bytecode (abstract contract or interface?)")]
    EmptyBytecode(String),
    #[error("invalid bytecode for {name}: {reason}")]
    InvalidBytecode { name: String, reason: String },
    #[error("invalid constructor arguments: {0}")]
    ConstructorArgs(String),
}
