//! Shell 命令工具
//!
//! 在会话工作目录下通过 cmd /C（Windows）或 sh -c 执行一条命令，报告成功/失败文本。
//! 无白名单：按设计模型是受信任的，动作不可回滚（见 DESIGN.md）。

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use crate::tools::{Tool, ToolName, ToolOutput};

/// stdout 回传给模型的最大字符数
const STDOUT_PREVIEW_CHARS: usize = 2000;

/// 命令执行工具：execute_cmd_command
pub struct CmdTool {
    working_dir: PathBuf,
    timeout_secs: u64,
}

impl CmdTool {
    pub fn new(working_dir: impl Into<PathBuf>, timeout_secs: u64) -> Self {
        Self {
            working_dir: working_dir.into(),
            timeout_secs,
        }
    }
}

#[async_trait]
impl Tool for CmdTool {
    fn name(&self) -> ToolName {
        ToolName::ExecuteCmdCommand
    }

    fn description(&self) -> &str {
        "Run a shell command in the session working directory and report success or failure."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The command line to execute"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
        let command = args
            .get("command")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        if command.is_empty() {
            return Err("missing required key 'command'".to_string());
        }

        tracing::info!(command = %command, "cmd tool execute");

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command.as_str()]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command.as_str()]);
            c
        };
        cmd.current_dir(&self.working_dir);
        // 超时丢弃 future 时连带杀掉子进程，命令不得在会话继续后仍在运行
        cmd.kill_on_drop(true);

        let output = tokio::time::timeout(
            std::time::Duration::from_secs(self.timeout_secs),
            cmd.output(),
        )
        .await
        .map_err(|_| format!("command timed out after {}s", self.timeout_secs))?
        .map_err(|e| format!("execution failed: {e}"))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(format!(
                "exit {:?}\nstderr: {}",
                output.status.code(),
                stderr.trim()
            ));
        }

        let stdout = stdout.trim();
        if stdout.is_empty() {
            Ok(ToolOutput::Text(format!("{command} has run successfully")))
        } else {
            let preview: String = stdout.chars().take(STDOUT_PREVIEW_CHARS).collect();
            Ok(ToolOutput::Text(format!(
                "{command} has run successfully\noutput: {preview}"
            )))
        }
    }
}
