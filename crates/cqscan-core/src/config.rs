use cqscan_deps::{
    ApprovalTables, Classifier, MalformedPolicy, Scope, SpecialCaseRule, TrustMode, TrustPolicy,
    DEFAULT_MARKER,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
///
/// Loaded from a TOML file when there is one. Priority: CLI > File > Defaults.
/// The approval tables in here are merged on top of the compiled-in data.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub trust: TrustConfig,
    #[serde(default)]
    pub special_case: SpecialCaseConfig,
    #[serde(default)]
    pub tables: TablesConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            debug!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Load config from a specific file; unlike `load`, a missing file is an error
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(crate::Error::ConfigNotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Save config to a file, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Get the default config file path
    /// Uses XDG on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("cqscan");

        Ok(config_dir.join("config.toml"))
    }

    /// A copy of this config with the built-in tables written out explicitly,
    /// so the result is a complete, editable data file
    pub fn with_builtin_tables(&self) -> Self {
        let mut expanded = self.clone();
        let tables = self.approval_tables();
        expanded.tables = TablesConfig {
            replace_builtin: true,
            unversioned: tables.unversioned.to_map(),
            versioned: tables.versioned.to_map(),
        };
        expanded
    }

    /// Effective approval tables: built-in data (unless replaced) plus configured entries
    pub fn approval_tables(&self) -> ApprovalTables {
        let mut tables = if self.tables.replace_builtin {
            ApprovalTables::empty()
        } else {
            ApprovalTables::builtin()
        };

        tables.unversioned.extend(self.tables.unversioned.clone());
        tables.versioned.extend(self.tables.versioned.clone());
        tables
    }

    /// Flags given on the command line win over the config file
    pub fn apply_cli_overrides(&mut self, on_malformed: Option<MalformedPolicy>, skip_trusted: bool) {
        if let Some(policy) = on_malformed {
            self.report.on_malformed = policy;
        }
        if skip_trusted {
            self.trust.mode = TrustMode::Skip;
        }
    }

    pub fn build_classifier(&self) -> Classifier {
        let special_case = if self.special_case.enabled {
            Some(SpecialCaseRule {
                artifact_prefix: self.special_case.artifact_prefix.clone(),
                packaging_suffix: self.special_case.packaging_suffix.clone(),
                reference: self.special_case.reference.clone(),
            })
        } else {
            None
        };

        Classifier::new(self.approval_tables())
            .with_marker(self.report.marker.clone())
            .with_scopes(self.report.scopes.clone())
            .with_trust(TrustPolicy {
                groups: self.trust.groups.clone(),
                mode: self.trust.mode,
            })
            .with_special_case(special_case)
            .with_malformed_policy(self.report.on_malformed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// First field a line must have to count as a dependency line
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Scopes that get classified; everything else is ignored
    #[serde(default = "Scope::all")]
    pub scopes: Vec<Scope>,

    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            scopes: Scope::all(),
            on_malformed: MalformedPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrustConfig {
    /// Group prefixes of organizations whose artifacts need no CQ
    #[serde(default = "default_trusted_groups")]
    pub groups: Vec<String>,

    #[serde(default)]
    pub mode: TrustMode,
}

fn default_trusted_groups() -> Vec<String> {
    TrustPolicy::default().groups
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            groups: default_trusted_groups(),
            mode: TrustMode::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialCaseConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,

    #[serde(default = "default_packaging_suffix")]
    pub packaging_suffix: String,

    #[serde(default = "default_special_reference")]
    pub reference: String,
}

fn default_enabled() -> bool {
    true
}

fn default_artifact_prefix() -> String {
    SpecialCaseRule::default().artifact_prefix
}

fn default_packaging_suffix() -> String {
    SpecialCaseRule::default().packaging_suffix
}

fn default_special_reference() -> String {
    SpecialCaseRule::default().reference
}

impl Default for SpecialCaseConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            artifact_prefix: default_artifact_prefix(),
            packaging_suffix: default_packaging_suffix(),
            reference: default_special_reference(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TablesConfig {
    /// Ignore the compiled-in approval data and use only the entries below
    #[serde(default)]
    pub replace_builtin: bool,

    /// `group:artifact:packaging` -> CQ reference
    #[serde(default)]
    pub unversioned: BTreeMap<String, String>,

    /// `group:artifact:packaging:version` -> CQ reference
    #[serde(default)]
    pub versioned: BTreeMap<String, String>,
}
