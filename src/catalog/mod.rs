//! Global catalog state as reported by DFHRMUTL.

pub mod parse;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use parse::{normalize_lines, parse_catalog_status, reason_code, REASON_CODE_MARKER};

/// Restart settings read back from the global catalog.
///
/// A field is `None` when the utility output did not contain exactly one line
/// for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStatus {
    pub autostart_override: Option<String>,
    pub nextstart_type: Option<String>,
}

/// Values accepted by the `SET_AUTO_START` utility command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutostartOverride {
    /// Leave the next start type to the region's own START parameter.
    AutoAsIs,
    /// Force a cold start on the next autostart.
    AutoCold,
    /// Force an initial start on the next autostart.
    AutoInit,
}

impl AutostartOverride {
    /// The keyword as DFHRMUTL spells it, both in SYSIN and in its report.
    pub fn keyword(&self) -> &'static str {
        match self {
            AutostartOverride::AutoAsIs => "AUTOASIS",
            AutostartOverride::AutoCold => "AUTOCOLD",
            AutostartOverride::AutoInit => "AUTOINIT",
        }
    }

    /// SYSIN text that asks the utility to apply this override.
    pub fn command(&self) -> String {
        format!("SET_AUTO_START={}", self.keyword())
    }
}

impl fmt::Display for AutostartOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for AutostartOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', '_'], "").as_str() {
            "AUTOASIS" => Ok(AutostartOverride::AutoAsIs),
            "AUTOCOLD" => Ok(AutostartOverride::AutoCold),
            "AUTOINIT" => Ok(AutostartOverride::AutoInit),
            other => Err(format!("unknown autostart override: {other}")),
        }
    }
}
