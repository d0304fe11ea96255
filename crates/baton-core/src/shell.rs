//! Subprocess invocation for externally-implemented stages.
//!
//! A shell handler runs a configured command with the current stage context
//! as JSON on stdin and reads one JSON object back from stdout:
//!
//! ```json
//! {"status": "ok", "summary": "built 3 modules", "score": 92, "context": {"developed": true}}
//! ```
//!
//! Only `status` is required. Any `context` entries are merged into the run
//! context for later stages. A non-zero exit with parseable stdout means the
//! work ran and reported its own outcome; a non-zero exit with no usable
//! stdout is recorded as a failed stage. Scores above 100 are clamped.

use crate::context::StageContext;
use crate::error::{BatonError, Result};
use crate::handler::StageHandler;
use crate::report::StageResult;
use crate::types::{StageId, StageStatus};
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Deserialize)]
struct CommandOutput {
    status: StageStatus,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    score: Option<u32>,
    #[serde(default)]
    context: StageContext,
}

/// Runs one stage through a shell command configured in config.yaml.
pub struct ShellHandler {
    command: String,
    root: PathBuf,
}

impl ShellHandler {
    pub fn new(command: impl Into<String>, root: impl AsRef<Path>) -> Self {
        Self {
            command: command.into(),
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl StageHandler for ShellHandler {
    fn handle(&self, stage: StageId, ctx: &mut StageContext) -> Result<StageResult> {
        let stdin_json = serde_json::to_string(&ctx.to_json())?;

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.root)
            .env("BATON_ROOT", &self.root)
            .env("BATON_STAGE", stage.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                BatonError::Handler(format!("failed to spawn '{}': {e}", self.command))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A command may exit without reading its input; that is not an error.
            if let Err(e) = stdin.write_all(stdin_json.as_bytes()) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(BatonError::Handler(format!("failed to write stdin: {e}")));
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| BatonError::Handler(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let trimmed = stdout.trim();

        // Silent success: the command did its work without reporting details.
        if trimmed.is_empty() && output.status.success() {
            return Ok(StageResult::ok(
                stage,
                format!("command '{}' completed", self.command),
            ));
        }

        match serde_json::from_str::<CommandOutput>(trimmed) {
            Ok(parsed) => Ok(parsed.into_result(stage, ctx)),
            Err(_) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let hint: String = stderr.trim().chars().take(200).collect();
                Ok(StageResult::failed(
                    stage,
                    format!(
                        "command '{}' exited with {}: {hint}",
                        self.command, output.status
                    ),
                ))
            }
            Err(e) => Ok(StageResult::failed(
                stage,
                format!("command '{}' wrote unparseable output: {e}", self.command),
            )),
        }
    }
}

impl CommandOutput {
    fn into_result(self, stage: StageId, ctx: &mut StageContext) -> StageResult {
        ctx.absorb(self.context);
        let summary = self.summary.unwrap_or_else(|| match self.status {
            StageStatus::Ok => "completed".to_string(),
            StageStatus::Failed => "failed without details".to_string(),
            StageStatus::Skipped => "skipped by handler".to_string(),
        });
        StageResult {
            stage,
            status: self.status,
            summary,
            score: self.score.map(|s| s.min(MAX_SCORE)),
            skip_cause: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
