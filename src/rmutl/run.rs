//! Retry loop around DFHRMUTL runs.

use tracing::{info, warn};

use crate::catalog::{parse_catalog_status, AutostartOverride, CatalogStatus};
use crate::config::UtilityConfig;
use crate::dataset::DatasetStore;
use crate::execution::{ExecutionLog, ExecutionRecord};
use crate::mvs::ProgramRunner;

use super::classify::{classify, Outcome};
use super::invoke::{InvokeError, Invoker};
use super::{RmutlError, PROGRAM};

/// The two things DFHRMUTL is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Report the catalog's autostart override and next start type.
    Inquire,
    /// Apply a `SET_AUTO_START` command.
    Update,
}

impl Operation {
    fn for_command(command: &str) -> Self {
        if command.is_empty() {
            Operation::Inquire
        } else {
            Operation::Update
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Operation::Inquire => "Get current catalog",
            Operation::Update => "Updating autostart override",
        }
    }

    /// Execution record name for the given 1-based attempt.
    pub fn execution_name(&self, attempt: u32) -> String {
        format!("{} - {} - Run {}", PROGRAM, self.description(), attempt)
    }
}

/// Result of [`GlobalCatalog::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutput {
    Updated(ExecutionLog),
    Inquired(ExecutionLog, CatalogStatus),
}

impl RunOutput {
    pub fn executions(&self) -> &ExecutionLog {
        match self {
            RunOutput::Updated(executions) | RunOutput::Inquired(executions, _) => executions,
        }
    }
}

/// Inspects and updates a CICS global catalog through DFHRMUTL.
pub struct GlobalCatalog {
    invoker: Invoker,
    config: UtilityConfig,
}

impl GlobalCatalog {
    pub fn new(
        runner: Box<dyn ProgramRunner>,
        store: Box<dyn DatasetStore>,
        config: UtilityConfig,
    ) -> Self {
        Self {
            invoker: Invoker::new(runner, store, &config),
            config,
        }
    }

    /// Read the autostart override and next start type of the catalog at
    /// `location`, using DFHRMUTL from the `sdfhload` load library.
    pub fn get_status(
        &self,
        location: &str,
        sdfhload: &str,
    ) -> Result<(ExecutionLog, CatalogStatus), RmutlError> {
        let (executions, report) = self.attempt(location, sdfhload, "")?;
        let status = parse_catalog_status(&report);
        info!(
            location,
            autostart_override = ?status.autostart_override,
            nextstart_type = ?status.nextstart_type,
            "read global catalog status"
        );
        Ok((executions, status))
    }

    /// Set the autostart override of the catalog at `location`.
    pub fn set_autostart_override(
        &self,
        location: &str,
        sdfhload: &str,
        value: AutostartOverride,
    ) -> Result<ExecutionLog, RmutlError> {
        let (executions, _) = self.attempt(location, sdfhload, &value.command())?;
        info!(location, autostart_override = %value, "updated autostart override");
        Ok(executions)
    }

    /// Run DFHRMUTL with a raw SYSIN `command`. An empty command inquires and
    /// parses the catalog status; anything else is an update.
    pub fn run(
        &self,
        location: &str,
        sdfhload: &str,
        command: &str,
    ) -> Result<RunOutput, RmutlError> {
        let (executions, report) = self.attempt(location, sdfhload, command)?;
        match Operation::for_command(command) {
            Operation::Update => Ok(RunOutput::Updated(executions)),
            Operation::Inquire => Ok(RunOutput::Inquired(
                executions,
                parse_catalog_status(&report),
            )),
        }
    }

    /// Drive up to `retry_attempts` runs. Returns the executions and the
    /// SYSPRINT report of the last run made.
    fn attempt(
        &self,
        location: &str,
        sdfhload: &str,
        command: &str,
    ) -> Result<(ExecutionLog, String), RmutlError> {
        let operation = Operation::for_command(command);
        let attempts = self.config.attempts();
        let mut executions = ExecutionLog::new();
        let mut report = String::new();
        let mut settled = false;

        for attempt in 1..=attempts {
            let name = operation.execution_name(attempt);

            let response = match self.invoker.execute(location, sdfhload, command) {
                Ok(response) => response,
                Err(err) => return Err(invoke_failure(err, name, executions)),
            };

            let outcome = classify(&response);
            executions.push(ExecutionRecord::new(
                name,
                response.rc,
                response.stdout.as_str(),
                response.stderr.as_str(),
            ));
            report = response.stdout;

            match outcome {
                Outcome::Success { rc_overridden } => {
                    if rc_overridden {
                        info!(
                            attempt,
                            rc = response.rc,
                            "DFHRMUTL completed despite non-zero return code, treating as rc 0"
                        );
                        executions.override_last_rc(0);
                    }
                    settled = true;
                    break;
                }
                Outcome::BenignRetry { reason_code } => {
                    warn!(
                        attempt,
                        attempts,
                        rc = response.rc,
                        reason_code = reason_code.as_str(),
                        "DFHRMUTL failed with a retryable reason code"
                    );
                }
                Outcome::TerminalFailure(details) => {
                    warn!(
                        attempt,
                        rc = details.rc,
                        reason_code = ?details.reason_code,
                        "DFHRMUTL failed"
                    );
                    return Err(RmutlError::Utility {
                        message: details.message(),
                        executions,
                    });
                }
            }
        }

        if !settled {
            // The last run still failed; its report is used as-is.
            warn!(
                attempts,
                location, "DFHRMUTL retries exhausted without a successful run"
            );
        }

        Ok((executions, report))
    }
}

/// Record an attempt that produced no SYSPRINT report and convert the failure.
fn invoke_failure(err: InvokeError, name: String, mut executions: ExecutionLog) -> RmutlError {
    match err {
        InvokeError::Sysprint {
            dataset,
            source,
            response,
        } => {
            let stderr = [response.stderr.trim_end(), source.stderr_response.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("\n");
            executions.push(ExecutionRecord::new(
                name,
                response.rc,
                response.stdout,
                stderr,
            ));
            warn!(
                dataset = dataset.as_str(),
                rc = response.rc,
                storage_rc = source.rc,
                "unable to read SYSPRINT"
            );
            RmutlError::StorageAccess {
                dataset,
                source,
                executions,
            }
        }
        InvokeError::Launch { program, source } => {
            executions.push(ExecutionRecord::new(name, -1, "", source.to_string()));
            warn!(program = program.as_str(), error = %source, "unable to launch");
            RmutlError::Launch {
                program,
                source,
                executions,
            }
        }
    }
}
