use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;

use gcdctl::catalog::AutostartOverride;
use gcdctl::config::{GcdctlConfig, LoggingConfig};
use gcdctl::execution::ExecutionLog;
use gcdctl::idcams::{self, ClusterDefinition, Parameter};
use gcdctl::rmutl::RmutlError;

#[derive(Parser)]
#[command(
    name = "gcdctl",
    about = "CICS global catalog control via the DFHRMUTL recovery manager utility",
    version,
    long_about = None
)]
struct Cli {
    /// Configuration file (takes precedence over GCDCTL_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the autostart override and next start type of a global catalog
    Status {
        /// Global catalog dataset name
        #[arg(long)]
        gcd: String,

        /// CICS SDFHLOAD load library holding DFHRMUTL
        #[arg(long)]
        sdfhload: String,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Set the autostart override of a global catalog
    SetAutostart {
        /// Global catalog dataset name
        #[arg(long)]
        gcd: String,

        /// CICS SDFHLOAD load library holding DFHRMUTL
        #[arg(long)]
        sdfhload: String,

        /// Override to apply: auto-as-is, auto-cold or auto-init
        #[arg(long = "override")]
        value: AutostartOverride,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Print the IDCAMS DEFINE CLUSTER statement for a new global catalog
    Define {
        /// Global catalog dataset name
        #[arg(long)]
        gcd: String,

        /// Replace a default parameter section, e.g. `DATA.CONTROLINTERVALSIZE=4096`
        /// or `CLUSTER.SPANNED`. Any parameter for a section replaces that whole
        /// section. Repeatable.
        #[arg(long = "param", value_name = "SECTION.KEY[=VALUE]")]
        params: Vec<Parameter>,

        /// Print the parameter sections as JSON instead
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = GcdctlConfig::resolve(cli.config.as_deref())?;
    init_logging(&resolved.config.logging);
    resolved.log_skipped();
    debug!(source = ?resolved.source, "configuration resolved");
    let config = resolved.config;

    match cli.command {
        Commands::Status {
            gcd,
            sdfhload,
            json,
        } => {
            tracing::info!(%gcd, %sdfhload, "Reading global catalog status");
            let catalog = gcdctl::global_catalog(&config);
            let (executions, status) = catalog
                .get_status(&gcd, &sdfhload)
                .map_err(report_failure)?;

            if json {
                let out = json!({
                    "changed": false,
                    "autostart_override": status.autostart_override,
                    "next_start": status.nextstart_type,
                    "executions": executions,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Global catalog:     {}", gcd);
                println!(
                    "Autostart override: {}",
                    status.autostart_override.as_deref().unwrap_or("(not reported)")
                );
                println!(
                    "Next start type:    {}",
                    status.nextstart_type.as_deref().unwrap_or("(not reported)")
                );
                println!("DFHRMUTL runs:      {}", executions.len());
            }
        }
        Commands::SetAutostart {
            gcd,
            sdfhload,
            value,
            json,
        } => {
            tracing::info!(%gcd, %sdfhload, %value, "Setting autostart override");
            let catalog = gcdctl::global_catalog(&config);
            let executions = catalog
                .set_autostart_override(&gcd, &sdfhload, value)
                .map_err(report_failure)?;

            if json {
                let out = json!({
                    "changed": true,
                    "autostart_override": value.keyword(),
                    "executions": executions,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "Autostart override of {} set to {} ({} DFHRMUTL run(s))",
                    gcd,
                    value,
                    executions.len()
                );
            }
        }
        Commands::Define { gcd, params, json } => {
            let definition = ClusterDefinition::global_catalog(idcams::overrides(&params));
            if json {
                println!("{}", serde_json::to_string_pretty(&definition)?);
            } else {
                println!("{}", definition.render(&gcd));
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Print every DFHRMUTL run to stderr so the operator sees the full history.
fn report_failure(err: RmutlError) -> anyhow::Error {
    print_executions(err.executions());
    anyhow::Error::new(err)
}

fn print_executions(executions: &ExecutionLog) {
    for record in executions {
        eprintln!("--- {} (rc={})", record.name, record.rc);
        if !record.stdout.trim().is_empty() {
            eprintln!("{}", record.stdout.trim_end());
        }
        if !record.stderr.trim().is_empty() {
            eprintln!("{}", record.stderr.trim_end());
        }
    }
}
