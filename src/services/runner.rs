//! Case runner capability and its external-process implementation.
//!
//! The external runner is a script spoken to over stdin/stdout: one JSON
//! payload in, at most one JSON outcome out. Exit code 0 means the outcome
//! on stdout is authoritative; any other exit code is an execution failure
//! regardless of output content.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::RunnerConfig;
use crate::models::{ExecutionResult, RunnerPayload};

/// Executes one case payload and returns a structured outcome.
///
/// Implementations must never panic or error out of this boundary; every
/// failure mode degrades to a `failed` outcome.
#[async_trait]
pub trait CaseRunner: Send + Sync {
    async fn run(&self, payload: &RunnerPayload) -> ExecutionResult;
}

/// Runs cases by spawning the configured interpreter on the driver script.
pub struct ExternalProcessRunner {
    config: RunnerConfig,
}

impl ExternalProcessRunner {
    pub fn new(config: RunnerConfig) -> Self {
        ExternalProcessRunner { config }
    }

    async fn invoke(&self, input: &str) -> ExecutionResult {
        // kill_on_drop reaps the child if the deadline cancels this future
        let mut child = match Command::new(&self.config.interpreter)
            .arg(&self.config.script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return ExecutionResult::failed(e.to_string()),
        };

        // Write the payload and drop the handle so the child sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                let captured = match child.wait_with_output().await {
                    Ok(output) => Self::merge_output(&output.stdout, &output.stderr),
                    Err(_) => String::new(),
                };
                return Self::spawn_failure(e.to_string(), captured);
            }
        }

        match child.wait_with_output().await {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let captured = Self::merge_output(&output.stdout, &output.stderr);

                if output.status.success() && !stdout.trim().is_empty() {
                    match serde_json::from_str::<ExecutionResult>(stdout.trim()) {
                        Ok(mut result) => {
                            // Runners that omit logs still leave their raw
                            // output in the report
                            if result.logs.as_deref().is_none_or(str::is_empty) {
                                result.logs = Some(captured);
                            }
                            result
                        }
                        Err(_) => Self::execution_failure(captured),
                    }
                } else {
                    Self::execution_failure(captured)
                }
            }
            Err(e) => Self::spawn_failure(e.to_string(), String::new()),
        }
    }

    fn merge_output(stdout: &[u8], stderr: &[u8]) -> String {
        let mut merged = String::from_utf8_lossy(stdout).into_owned();
        let stderr = String::from_utf8_lossy(stderr);
        if !stderr.trim().is_empty() {
            if !merged.is_empty() && !merged.ends_with('\n') {
                merged.push('\n');
            }
            merged.push_str(&stderr);
        }
        merged
    }

    /// Non-zero exit, empty output or unparseable output.
    fn execution_failure(captured: String) -> ExecutionResult {
        ExecutionResult {
            status: "failed".to_string(),
            error: Some("execution failed".to_string()),
            logs: Some(captured),
            ..Default::default()
        }
    }

    /// Spawn/write/read error; captured output may be partial.
    fn spawn_failure(error: String, captured: String) -> ExecutionResult {
        ExecutionResult {
            status: "failed".to_string(),
            error: Some(error),
            logs: (!captured.is_empty()).then_some(captured),
            ..Default::default()
        }
    }
}

#[async_trait]
impl CaseRunner for ExternalProcessRunner {
    async fn run(&self, payload: &RunnerPayload) -> ExecutionResult {
        let input = match serde_json::to_string(payload) {
            Ok(input) => input,
            Err(e) => return ExecutionResult::failed(e.to_string()),
        };

        match self.config.exec_timeout {
            Some(deadline) => {
                match tokio::time::timeout(deadline, self.invoke(&input)).await {
                    Ok(result) => result,
                    Err(_) => ExecutionResult::failed(format!(
                        "execution timed out after {}s",
                        deadline.as_secs()
                    )),
                }
            }
            None => self.invoke(&input).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn payload() -> RunnerPayload {
        RunnerPayload {
            case_id: 1,
            case_type: "WEB".to_string(),
            environment: None,
            content: serde_json::json!({"script": "noop"}),
        }
    }

    /// Shell script standing in for the driver; reads stdin like the real one.
    fn script(body: &str) -> (NamedTempFile, RunnerConfig) {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cat > /dev/null").unwrap();
        writeln!(file, "{}", body).unwrap();
        let config = RunnerConfig {
            interpreter: "sh".to_string(),
            script: file.path().to_path_buf(),
            exec_timeout: Some(Duration::from_secs(20)),
        };
        (file, config)
    }

    #[tokio::test]
    async fn test_clean_exit_with_output_is_parsed() {
        let (_file, config) =
            script(r#"echo '{"status":"success","durationMs":12,"logs":"ok"}'"#);
        let result = ExternalProcessRunner::new(config).run(&payload()).await;

        assert!(result.is_success());
        assert_eq!(result.duration_ms, Some(12));
        assert_eq!(result.logs.as_deref(), Some("ok"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_execution_failure_with_raw_logs() {
        let (_file, config) = script("echo boom\nexit 1");
        let result = ExternalProcessRunner::new(config).run(&payload()).await;

        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("execution failed"));
        assert_eq!(result.logs.as_deref().map(str::trim), Some("boom"));
    }

    #[tokio::test]
    async fn test_empty_output_on_clean_exit_is_execution_failure() {
        let (_file, config) = script("exit 0");
        let result = ExternalProcessRunner::new(config).run(&payload()).await;

        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("execution failed"));
    }

    #[tokio::test]
    async fn test_unparseable_output_is_execution_failure() {
        let (_file, config) = script("echo 'not json'");
        let result = ExternalProcessRunner::new(config).run(&payload()).await;

        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("execution failed"));
        assert_eq!(result.logs.as_deref().map(str::trim), Some("not json"));
    }

    #[tokio::test]
    async fn test_stderr_is_merged_into_captured_logs() {
        let (_file, config) = script("echo oops >&2\nexit 2");
        let result = ExternalProcessRunner::new(config).run(&payload()).await;

        assert!(!result.is_success());
        assert!(result.logs.unwrap().contains("oops"));
    }

    #[tokio::test]
    async fn test_missing_interpreter_yields_failed_outcome() {
        let config = RunnerConfig {
            interpreter: "definitely-not-a-real-binary".to_string(),
            script: "driver.py".into(),
            exec_timeout: Some(Duration::from_secs(5)),
        };
        let result = ExternalProcessRunner::new(config).run(&payload()).await;

        assert!(!result.is_success());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_deadline_kills_hung_runner() {
        let (_file, config) = script("sleep 30");
        let config = RunnerConfig {
            exec_timeout: Some(Duration::from_millis(200)),
            ..config
        };
        let result = ExternalProcessRunner::new(config).run(&payload()).await;

        assert!(!result.is_success());
        assert!(result.error.unwrap().contains("timed out"));
    }
}
