//! `mvscmd`-style launcher process wrapper.
//!
//! The launcher is invoked as
//! `<launcher> --pgm=<PROGRAM> --<ddname>=<value>... [-v] [-d]`, where dataset
//! DDs pass the dataset name, inline input is staged to a scratch file whose
//! path is passed, and output captures pass a path under the work directory.
//!
//! Output captures are plain files, so the launcher owns their record format:
//! an output DD's `record_length` is not passed on the command line. Runners
//! that allocate real datasets are expected to honour it.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::debug;

use super::{DdDefinition, ProgramRequest, ProgramResponse, ProgramRunner};

/// Runs batch programs through an external launcher executable.
#[derive(Debug, Clone)]
pub struct MvsCmd {
    /// Path (or bare command name resolved via `$PATH`) of the launcher.
    launcher: String,
    /// Directory holding SYSIN staging files and output captures.
    work_dir: PathBuf,
}

impl MvsCmd {
    pub fn new(launcher: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            launcher: launcher.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Build launcher arguments, staging inline input into `staged`.
    ///
    /// Staged files must outlive the launched process.
    fn arguments(
        &self,
        request: &ProgramRequest,
        staged: &mut Vec<NamedTempFile>,
    ) -> std::io::Result<Vec<OsString>> {
        let mut args = vec![OsString::from(format!("--pgm={}", request.program))];

        for dd in &request.dds {
            let mut arg = OsString::from(format!("--{}=", dd.name.to_lowercase()));
            match &dd.definition {
                DdDefinition::Dataset { name } => arg.push(name),
                DdDefinition::Input { content } => {
                    let mut file = tempfile::Builder::new()
                        .prefix(&format!("{}-", dd.name.to_lowercase()))
                        .tempfile_in(&self.work_dir)?;
                    file.write_all(content.as_bytes())?;
                    file.flush()?;
                    arg.push(file.path());
                    staged.push(file);
                }
                DdDefinition::Output {
                    name,
                    record_length,
                } => {
                    debug!(dd = dd.name.as_str(), record_length, "record format left to launcher");
                    arg.push(self.work_dir.join(name));
                }
            }
            args.push(arg);
        }

        if request.verbose {
            args.push(OsString::from("-v"));
        }
        if request.debug {
            args.push(OsString::from("-d"));
        }
        Ok(args)
    }
}

impl ProgramRunner for MvsCmd {
    fn execute(&self, request: &ProgramRequest) -> std::io::Result<ProgramResponse> {
        fs::create_dir_all(&self.work_dir)?;

        let mut staged = Vec::new();
        let args = self.arguments(request, &mut staged)?;
        debug!(
            launcher = self.launcher.as_str(),
            program = request.program.as_str(),
            ?args,
            "launching batch program"
        );

        let output = Command::new(&self.launcher).args(&args).output()?;
        drop(staged);

        // A launcher killed by a signal has no exit code.
        let rc = output.status.code().unwrap_or(-1);
        debug!(program = request.program.as_str(), rc, "batch program finished");

        Ok(ProgramResponse {
            rc,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
