//! MVS batch program invocation: DD bindings and the runner seam.

pub mod mvscmd;

use serde::Serialize;

pub use mvscmd::MvsCmd;

/// What a DD name is bound to for one program run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DdDefinition {
    /// An existing cataloged dataset.
    Dataset { name: String },
    /// Inline input records (SYSIN-style).
    Input { content: String },
    /// A fresh output capture the caller reads back after the run.
    Output { name: String, record_length: u32 },
}

/// A single `//DDNAME DD ...` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DdStatement {
    pub name: String,
    pub definition: DdDefinition,
}

impl DdStatement {
    pub fn new(name: impl Into<String>, definition: DdDefinition) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }

    pub fn dataset(name: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self::new(name, DdDefinition::Dataset { name: dataset.into() })
    }

    pub fn input(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, DdDefinition::Input { content: content.into() })
    }

    pub fn output(name: impl Into<String>, dataset: impl Into<String>, record_length: u32) -> Self {
        Self::new(
            name,
            DdDefinition::Output {
                name: dataset.into(),
                record_length,
            },
        )
    }
}

/// Everything needed to run one batch program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramRequest {
    pub program: String,
    pub dds: Vec<DdStatement>,
    pub verbose: bool,
    pub debug: bool,
}

impl ProgramRequest {
    pub fn dd(&self, name: &str) -> Option<&DdStatement> {
        self.dds.iter().find(|dd| dd.name.eq_ignore_ascii_case(name))
    }
}

/// Result of running a batch program to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramResponse {
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs an MVS program with its DD bindings and waits for it to finish.
///
/// Errors are reserved for failing to run the program at all; a program that
/// ran and failed reports that through [`ProgramResponse::rc`].
pub trait ProgramRunner: Send + Sync {
    fn execute(&self, request: &ProgramRequest) -> std::io::Result<ProgramResponse>;
}
