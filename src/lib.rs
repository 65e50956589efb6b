//! gcdctl -- CICS global catalog control through DFHRMUTL.
//!
//! This crate drives the CICS recovery manager batch utility to read and set
//! the autostart override of a global catalog, retrying around the utility's
//! known transient failures and keeping a record of every run.

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod execution;
pub mod idcams;
pub mod mvs;
pub mod rmutl;

use config::GcdctlConfig;
use dataset::FileStore;
use mvs::MvsCmd;
use rmutl::GlobalCatalog;

/// Build a [`GlobalCatalog`] that launches DFHRMUTL through the configured
/// launcher and reads SYSPRINT captures from its work directory.
pub fn global_catalog(config: &GcdctlConfig) -> GlobalCatalog {
    let work_dir = config.launcher.work_dir.clone();
    tracing::debug!(
        launcher = config.launcher.program.as_str(),
        work_dir = %work_dir.display(),
        "building global catalog client"
    );
    GlobalCatalog::new(
        Box::new(MvsCmd::new(config.launcher.program.clone(), work_dir.clone())),
        Box::new(FileStore::new(work_dir)),
        config.utility.clone(),
    )
}
