//! A single DFHRMUTL run: bind DDs, launch, collect SYSPRINT.

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::UtilityConfig;
use crate::dataset::{DatasetStore, StorageError};
use crate::mvs::{DdStatement, ProgramRequest, ProgramResponse, ProgramRunner};

use super::PROGRAM;

/// Why a single run produced no usable response.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    /// DFHRMUTL ran but its SYSPRINT could not be collected. `response` is
    /// what the launcher returned for the run.
    #[error("Unable to read SYSPRINT dataset {dataset}")]
    Sysprint {
        dataset: String,
        source: StorageError,
        response: ProgramResponse,
    },
}

/// Runs DFHRMUTL once per call against a given global catalog.
pub struct Invoker {
    runner: Box<dyn ProgramRunner>,
    store: Box<dyn DatasetStore>,
    record_length: u32,
    capture_hlq: String,
}

impl Invoker {
    pub fn new(
        runner: Box<dyn ProgramRunner>,
        store: Box<dyn DatasetStore>,
        config: &UtilityConfig,
    ) -> Self {
        Self {
            runner,
            store,
            record_length: config.sysprint_record_length,
            capture_hlq: config.capture_hlq.clone(),
        }
    }

    /// Request for one run. An empty `command` makes DFHRMUTL report the
    /// catalog without changing it.
    pub fn request(
        &self,
        location: &str,
        sdfhload: &str,
        command: &str,
        sysprint: &str,
    ) -> ProgramRequest {
        ProgramRequest {
            program: PROGRAM.to_string(),
            dds: vec![
                DdStatement::dataset("steplib", sdfhload),
                DdStatement::dataset("dfhgcd", location),
                DdStatement::input("sysin", command),
                DdStatement::output("sysprint", sysprint, self.record_length),
            ],
            // Verbose makes the launcher print the attach exit message.
            verbose: true,
            debug: false,
        }
    }

    /// Run DFHRMUTL and return its response with stdout replaced by the
    /// SYSPRINT report. The capture dataset is deleted afterwards.
    pub fn execute(
        &self,
        location: &str,
        sdfhload: &str,
        command: &str,
    ) -> Result<ProgramResponse, InvokeError> {
        let sysprint = capture_name(&self.capture_hlq);
        let request = self.request(location, sdfhload, command, &sysprint);

        let mut response = self
            .runner
            .execute(&request)
            .map_err(|source| InvokeError::Launch {
                program: PROGRAM.to_string(),
                source,
            })?;

        let report = match self.collect(&sysprint) {
            Ok(report) => report,
            Err(source) => {
                return Err(InvokeError::Sysprint {
                    dataset: sysprint,
                    source,
                    response,
                })
            }
        };
        response.stdout = report;

        debug!(
            dataset = sysprint.as_str(),
            rc = response.rc,
            bytes = response.stdout.len(),
            "collected DFHRMUTL SYSPRINT"
        );
        Ok(response)
    }

    fn collect(&self, sysprint: &str) -> Result<String, StorageError> {
        let report = self.store.read(sysprint)?;
        self.store.delete(sysprint)?;
        Ok(report)
    }
}

/// Unique SYSPRINT dataset name: `<HLQ>.SYSPRINT.X<7 hex>`.
fn capture_name(hlq: &str) -> String {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}.SYSPRINT.X{}", hlq, &id[..7])
}
