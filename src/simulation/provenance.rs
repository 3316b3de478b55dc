//! Provenance record for a simulation run, following the tskit provenance
//! schema so the engine can store it alongside its output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::store::CATALOG_VERSION;

/// tskit provenance schema version the record conforms to
pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub system: String,
    pub machine: String,
    pub family: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryVersion {
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub os: OsInfo,
    pub libraries: BTreeMap<String, LibraryVersion>,
}

impl Environment {
    /// Describe the machine and build this process runs on.
    pub fn current() -> Self {
        let mut libraries = BTreeMap::new();
        libraries.insert(
            "catalog".to_string(),
            LibraryVersion {
                version: CATALOG_VERSION.to_string(),
            },
        );
        Self {
            os: OsInfo {
                system: std::env::consts::OS.to_string(),
                machine: std::env::consts::ARCH.to_string(),
                family: std::env::consts::FAMILY.to_string(),
            },
            libraries,
        }
    }
}

/// An execution of this tool: what ran, with which arguments, where and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub schema_version: String,
    pub software: Software,
    pub parameters: Parameters,
    pub environment: Environment,

    /// RFC 3339
    pub timestamp: String,
}

impl Provenance {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            software: Software {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            parameters: Parameters {
                command: command.into(),
                args,
            },
            environment: Environment::current(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Provenance of the current process, from its command line
    pub fn from_env() -> Self {
        let mut argv = std::env::args();
        let command = argv.next().unwrap_or_default();
        Self::new(command, argv.collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_document() {
        let prov = Provenance::new("popsim", vec!["simulate".to_string(), "esccol".to_string()]);
        assert_eq!(prov.schema_version, "1.0.0");
        assert_eq!(prov.software.name, "popsim-catalog");
        assert_eq!(prov.parameters.args, vec!["simulate", "esccol"]);
        assert_eq!(prov.environment.os.system, std::env::consts::OS);
        assert!(chrono::DateTime::parse_from_rfc3339(&prov.timestamp).is_ok());
    }

    #[test]
    fn test_provenance_json_layout() {
        let prov = Provenance::new("popsim", Vec::new());
        let value = serde_json::to_value(&prov).unwrap();
        for key in ["schema_version", "software", "parameters", "environment", "timestamp"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value["environment"]["os"]["machine"].is_string());
        assert_eq!(value["environment"]["libraries"]["catalog"]["version"], CATALOG_VERSION);
    }
}
