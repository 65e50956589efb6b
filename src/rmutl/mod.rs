//! DFHRMUTL (CICS recovery manager batch utility) control.
//!
//! DFHRMUTL reads and updates the autostart override record of a CICS global
//! catalog. Run under a launcher it is unreliable in two ways: it can exit
//! non-zero after doing its job, and it can fail transiently while the catalog
//! is held elsewhere. [`GlobalCatalog`] retries around both.

pub mod classify;
pub mod invoke;
pub mod run;

use thiserror::Error;

use crate::dataset::StorageError;
use crate::execution::ExecutionLog;

pub use classify::{classify, FailureDetails, Outcome};
pub use invoke::{InvokeError, Invoker};
pub use run::{GlobalCatalog, Operation, RunOutput};

/// Program name of the recovery manager batch utility.
pub const PROGRAM: &str = "DFHRMUTL";

/// Banner DFHRMUTL prints at the top of its SYSPRINT report.
pub const PROGRAM_HEADER: &str = "===DFHRMUTL CICS RECOVERY MANAGER BATCH UTILITY===";

/// Launcher message confirming DFHRMUTL returned control normally.
pub const SUBPROCESS_EXIT_MESSAGE: &str = "Attach Exit code: 0 from DFHRMUTL.";

/// Reason code for a failure that is safe to retry.
pub const BENIGN_REASON_CODE: &str = "A8";

/// Failures of a DFHRMUTL operation. Every variant carries the executions
/// made so far, including the one that failed.
#[derive(Debug, Error)]
pub enum RmutlError {
    /// DFHRMUTL itself reported a failure that is not safe to retry.
    #[error("{message}")]
    Utility {
        message: String,
        executions: ExecutionLog,
    },

    /// The SYSPRINT capture could not be read back or deleted.
    #[error("Unable to read SYSPRINT dataset {dataset}")]
    StorageAccess {
        dataset: String,
        source: StorageError,
        executions: ExecutionLog,
    },

    /// The launcher could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
        executions: ExecutionLog,
    },
}

impl RmutlError {
    /// Every execution made before the operation gave up.
    pub fn executions(&self) -> &ExecutionLog {
        match self {
            RmutlError::Utility { executions, .. }
            | RmutlError::StorageAccess { executions, .. }
            | RmutlError::Launch { executions, .. } => executions,
        }
    }
}
