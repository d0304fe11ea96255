use crate::error::{BatonError, Result};
use crate::paths;
use crate::types::StageId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// HandlerSpec
// ---------------------------------------------------------------------------

/// How a stage gets done. `shell` hands the stage to a command speaking the
/// JSON stdin/stdout protocol; `noop` marks it done without work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandlerSpec {
    Shell { command: String },
    Noop,
}

// ---------------------------------------------------------------------------
// StageOverride
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_run: Option<bool>,
}

// ---------------------------------------------------------------------------
// KeywordConfig
// ---------------------------------------------------------------------------

/// Project-level additions to the built-in classification vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_project: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bug_fix: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refactor: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enhancement: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub integration: Vec<String>,
}

impl KeywordConfig {
    pub fn is_empty(&self) -> bool {
        self.new_project.is_empty()
            && self.bug_fix.is_empty()
            && self.refactor.is_empty()
            && self.enhancement.is_empty()
            && self.integration.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub stages: HashMap<String, StageOverride>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub handlers: HashMap<String, HandlerSpec>,
    #[serde(default, skip_serializing_if = "KeywordConfig::is_empty")]
    pub keywords: KeywordConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            stages: HashMap::new(),
            handlers: HashMap::new(),
            keywords: KeywordConfig::default(),
        }
    }

    /// A ready-to-run starting config: every stage on a noop handler.
    pub fn scaffold(project_name: impl Into<String>) -> Self {
        let mut cfg = Self::new(project_name);
        for &stage in StageId::all() {
            cfg.handlers
                .insert(stage.as_str().to_string(), HandlerSpec::Noop);
        }
        cfg
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(BatonError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like `load`, but read-only queries on an uninitialized project fall
    /// back to the built-in defaults instead of failing.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Ok(cfg) => Ok(cfg),
            Err(BatonError::NotInitialized) => Ok(Self::new("unnamed")),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn handler_for(&self, stage: StageId) -> Option<&HandlerSpec> {
        self.handlers.get(stage.as_str())
    }

    pub fn stage_timeout(&self, stage: StageId) -> Duration {
        self.stages
            .get(stage.as_str())
            .and_then(|o| o.timeout_seconds)
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(stage.default_timeout_seconds()))
    }

    pub fn stage_always_run(&self, stage: StageId) -> bool {
        self.stages
            .get(stage.as_str())
            .and_then(|o| o.always_run)
            .unwrap_or_else(|| stage.always_run_default())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. All keys in stages must be valid stage names
        for stage_key in self.stages.keys() {
            if StageId::from_str(stage_key).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unknown stage '{stage_key}' in stages"),
                });
            }
        }

        // 2. All keys in handlers must be valid stage names
        for handler_key in self.handlers.keys() {
            if StageId::from_str(handler_key).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unknown stage '{handler_key}' in handlers"),
                });
            }
        }

        // 3. Shell handlers need a command
        for (handler_key, spec) in &self.handlers {
            if let HandlerSpec::Shell { command } = spec {
                if command.trim().is_empty() {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!("handler for stage '{handler_key}' has an empty command"),
                    });
                }
            }
        }

        // 4. A zero timeout would fail every run of the stage
        for (stage_key, ovr) in &self.stages {
            if ovr.timeout_seconds == Some(0) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("stage '{stage_key}' has timeout_seconds=0"),
                });
            }
        }

        // 5. Mandatory stages without a handler fail preflight on every run
        for &stage in StageId::all() {
            if stage.is_mandatory() && self.handler_for(stage).is_none() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "mandatory stage '{stage}' has no handler; every run will be refused"
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
