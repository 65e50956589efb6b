//! IDCAMS DEFINE CLUSTER parameters for a new global catalog.
//!
//! Sections are `CLUSTER`, `DATA` and `INDEX`. Overrides replace a default
//! section wholesale; they are not merged key by key.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

pub const RECORD_COUNT_DEFAULT: u32 = 4089;
pub const RECORD_SIZE_DEFAULT: u32 = 32760;
pub const CONTROL_INTERVAL_SIZE_DEFAULT: u32 = 32768;
pub const KEY_LENGTH: u32 = 52;
pub const KEY_OFFSET: u32 = 0;
pub const CI_PERCENT: u32 = 10;
pub const CA_PERCENT: u32 = 10;
pub const SHARE_CROSSREGION: u32 = 2;

/// Section names accepted in a DEFINE CLUSTER statement.
pub const SECTIONS: [&str; 3] = ["CLUSTER", "DATA", "INDEX"];

/// Parameters of one section; `None` marks a bare keyword such as `INDEXED`.
pub type Section = BTreeMap<String, Option<String>>;

/// One `SECTION.KEY[=VALUE]` parameter given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub section: String,
    pub key: String,
    pub value: Option<String>,
}

impl FromStr for Parameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = match s.split_once('=') {
            Some((path, value)) => (path, Some(value.trim().to_string())),
            None => (s, None),
        };
        let (section, key) = path
            .split_once('.')
            .ok_or_else(|| format!("expected SECTION.KEY[=VALUE], got '{s}'"))?;
        let section = section.trim().to_uppercase();
        let key = key.trim().to_uppercase();

        if !SECTIONS.contains(&section.as_str()) {
            return Err(format!(
                "unknown section '{section}' (expected one of {})",
                SECTIONS.join(", ")
            ));
        }
        if key.is_empty() {
            return Err(format!("missing parameter name in '{s}'"));
        }
        Ok(Self {
            section,
            key,
            value,
        })
    }
}

/// Group parameters into override sections, one section per name given.
pub fn overrides(parameters: &[Parameter]) -> BTreeMap<String, Section> {
    let mut sections: BTreeMap<String, Section> = BTreeMap::new();
    for parameter in parameters {
        sections
            .entry(parameter.section.clone())
            .or_default()
            .insert(parameter.key.clone(), parameter.value.clone());
    }
    sections
}

/// A full set of DEFINE CLUSTER sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterDefinition {
    sections: BTreeMap<String, Section>,
}

impl ClusterDefinition {
    /// Defaults for a CICS global catalog (DFHGCD) KSDS.
    pub fn global_catalog_defaults() -> Self {
        let cluster = section([
            (
                "RECORDSIZE",
                Some(format!("{RECORD_COUNT_DEFAULT} {RECORD_SIZE_DEFAULT}")),
            ),
            ("INDEXED", None),
            ("KEYS", Some(format!("{KEY_LENGTH} {KEY_OFFSET}"))),
            ("FREESPACE", Some(format!("{CI_PERCENT} {CA_PERCENT}"))),
            ("SHAREOPTIONS", Some(SHARE_CROSSREGION.to_string())),
            ("REUSE", None),
        ]);
        let data = section([(
            "CONTROLINTERVALSIZE",
            Some(CONTROL_INTERVAL_SIZE_DEFAULT.to_string()),
        )]);

        let mut sections = BTreeMap::new();
        sections.insert("CLUSTER".to_string(), cluster);
        sections.insert("DATA".to_string(), data);
        sections.insert("INDEX".to_string(), Section::new());
        Self { sections }
    }

    /// Global catalog defaults with `overrides` applied section by section.
    pub fn global_catalog(overrides: BTreeMap<String, Section>) -> Self {
        let mut definition = Self::global_catalog_defaults();
        for (name, section) in overrides {
            definition.sections.insert(name.to_uppercase(), section);
        }
        definition
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Render as an IDCAMS control statement for the dataset `name`.
    ///
    /// Each section gets a `NAME(...)`: the cluster uses `name` itself, the
    /// components append `.DATA` / `.INDEX`.
    pub fn render(&self, name: &str) -> String {
        let mut out = String::from("  DEFINE CLUSTER (");
        out.push_str(&format!("NAME({name})"));
        if let Some(cluster) = self.sections.get("CLUSTER") {
            push_parameters(&mut out, cluster);
        }
        out.push(')');

        for (section_name, section) in &self.sections {
            if section_name == "CLUSTER" {
                continue;
            }
            out.push_str(&format!(
                " -\n    {section_name} (NAME({name}.{section_name})"
            ));
            push_parameters(&mut out, section);
            out.push(')');
        }
        out
    }
}

fn section<const N: usize>(entries: [(&str, Option<String>); N]) -> Section {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn push_parameters(out: &mut String, section: &Section) {
    for (key, value) in section {
        match value {
            Some(value) => out.push_str(&format!(" -\n    {key}({value})")),
            None => out.push_str(&format!(" -\n    {key}")),
        }
    }
}
