//! Contract templates and their compilation.
//!
//! The three templates are fixed. [`SolcCompiler`] writes them into the
//! contracts directory, compiles with `solc` (OpenZeppelin resolved from
//! `node_modules`) and keeps the output for the rest of the process.

use core_logic::error::OpError;
use ethers::abi::{Abi, Token};
use ethers::types::Bytes;
use ethers_solc::artifacts::{BytecodeObject, Optimizer, Settings};
use ethers_solc::remappings::Remapping;
use ethers_solc::{Project, ProjectPathsConfig, Solc, SolcConfig};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    ConfidentialErc20,
    Nft,
    MemeToken,
}

impl ContractKind {
    pub const ALL: [ContractKind; 3] = [
        ContractKind::ConfidentialErc20,
        ContractKind::Nft,
        ContractKind::MemeToken,
    ];

    /// Solidity contract name, also the artifact name.
    pub fn name(self) -> &'static str {
        match self {
            ContractKind::ConfidentialErc20 => "ConfidentialERC20",
            ContractKind::Nft => "NFT",
            ContractKind::MemeToken => "MemeToken",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            ContractKind::ConfidentialErc20 => include_str!("templates/ConfidentialERC20.sol"),
            ContractKind::Nft => include_str!("templates/NFT.sol"),
            ContractKind::MemeToken => include_str!("templates/MemeToken.sol"),
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.sol", self.name())
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct CompiledContract {
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl CompiledContract {
    /// Creation payload: bytecode followed by the encoded constructor arguments.
    pub fn deploy_data(&self, args: &[Token]) -> Result<Bytes, OpError> {
        match &self.abi.constructor {
            Some(constructor) => constructor
                .encode_input(self.bytecode.to_vec(), args)
                .map(Bytes::from)
                .map_err(|e| OpError::invalid("constructor arguments", e.to_string())),
            None if args.is_empty() => Ok(self.bytecode.clone()),
            None => Err(OpError::invalid(
                "constructor arguments",
                "contract has no constructor",
            )),
        }
    }

    pub fn call_data(&self, function: &str, args: &[Token]) -> Result<Bytes, OpError> {
        let function = self
            .abi
            .function(function)
            .map_err(|e| OpError::invalid("contract call", e.to_string()))?;
        function
            .encode_input(args)
            .map(Bytes::from)
            .map_err(|e| OpError::invalid("contract call", e.to_string()))
    }
}

pub trait ContractCompiler: Send + Sync {
    fn compile(&self, kind: ContractKind) -> Result<CompiledContract, OpError>;
}

pub struct SolcCompiler {
    root: PathBuf,
    contracts_dir: PathBuf,
    cache: Mutex<HashMap<ContractKind, CompiledContract>>,
}

impl SolcCompiler {
    /// `root` is where `node_modules/@openzeppelin` lives.
    pub fn new(root: impl Into<PathBuf>, contracts_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            contracts_dir: contracts_dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn write_template(&self, kind: ContractKind) -> Result<PathBuf, OpError> {
        std::fs::create_dir_all(&self.contracts_dir).map_err(|e| {
            OpError::invalid(
                "contracts directory",
                format!("{}: {}", self.contracts_dir.display(), e),
            )
        })?;
        let path = self.contracts_dir.join(kind.file_name());
        std::fs::write(&path, kind.source())
            .map_err(|e| {
                OpError::invalid("contract source", format!("{}: {}", path.display(), e))
            })?;
        Ok(path)
    }

    fn project(&self) -> Result<Project, OpError> {
        let invalid = |e: String| OpError::invalid("compiler setup", e);

        let remapping: Remapping = "@openzeppelin/=node_modules/@openzeppelin/"
            .parse()
            .map_err(|e| invalid(format!("{:?}", e)))?;

        let paths = ProjectPathsConfig::builder()
            .root(&self.root)
            .sources(&self.contracts_dir)
            .artifacts(self.root.join("out"))
            .lib(self.root.join("node_modules"))
            .remapping(remapping)
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        let mut settings = Settings::default();
        settings.optimizer = Optimizer {
            enabled: Some(true),
            runs: Some(200),
            details: None,
        };

        let mut builder = Project::builder()
            .paths(paths)
            .solc_config(SolcConfig::builder().settings(settings).build())
            .set_auto_detect(true)
            .no_artifacts();

        if system_solc_available() {
            builder = builder.solc(Solc::default());
        }

        builder.build().map_err(|e| invalid(e.to_string()))
    }

    fn compile_uncached(&self, kind: ContractKind) -> Result<CompiledContract, OpError> {
        let source = self.write_template(kind)?;
        let project = self.project()?;

        let output = project
            .compile_files(vec![source])
            .map_err(|e| OpError::invalid(kind.name(), e.to_string()))?;

        if output.has_compiler_errors() {
            let errors: Vec<String> = output
                .output()
                .errors
                .iter()
                .filter(|e| e.severity.is_error())
                .map(|e| e.message.clone())
                .collect();
            return Err(OpError::invalid(
                kind.name(),
                format!("compilation errors: {}", errors.join(", ")),
            ));
        }

        let artifact = output
            .find_first(kind.name())
            .ok_or_else(|| {
                OpError::invalid(kind.name(), "compilation output is missing the contract")
            })?;

        let abi_json = artifact
            .abi
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| OpError::invalid(kind.name(), e.to_string()))?
            .ok_or_else(|| OpError::invalid(kind.name(), "no ABI"))?;
        let abi: Abi = serde_json::from_str(&abi_json)
            .map_err(|e| OpError::invalid(kind.name(), e.to_string()))?;

        let bytecode = match &artifact
            .bytecode
            .as_ref()
            .ok_or_else(|| OpError::invalid(kind.name(), "no bytecode"))?
            .object
        {
            BytecodeObject::Bytecode(bytes) => bytes.clone(),
            BytecodeObject::Unlinked(_) => {
                return Err(OpError::invalid(kind.name(), "bytecode needs linking"))
            }
        };

        Ok(CompiledContract { abi, bytecode })
    }
}

impl ContractCompiler for SolcCompiler {
    fn compile(&self, kind: ContractKind) -> Result<CompiledContract, OpError> {
        let cached = self
            .cache
            .lock()
            .map_err(|_| OpError::invalid(kind.name(), "compiler cache poisoned"))?
            .get(&kind)
            .cloned();
        if let Some(compiled) = cached {
            debug!("Using cached {} artifact", kind);
            return Ok(compiled);
        }

        info!("Compiling {}...", kind);
        let compiled = self.compile_uncached(kind)?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(kind, compiled.clone());
        }
        Ok(compiled)
    }
}

fn system_solc_available() -> bool {
    std::process::Command::new("solc")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Root for [`SolcCompiler`]: the directory holding `node_modules`, or the
/// current directory when none is found above `start`.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join("node_modules").join("@openzeppelin").is_dir())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start.to_path_buf())
}
