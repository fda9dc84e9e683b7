//! 工具执行器
//!
//! 统一调用入口：wire 标识符 + input_data 进，ToolResult 出。未知标识符、工具失败、
//! 超时全部归一化为文本结果（模型在下一轮看到并自行纠正），永不中断会话；
//! 控制面标识符（give_valid_command / stop）在此转为终止哨兵。每次调用输出 JSON 审计日志。

use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::time::timeout;

use crate::tools::{HaltKind, ScreenImage, ToolName, ToolOutput, ToolRegistry, ToolResult};

/// 工具执行器：持有注册表与单次调用超时
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, timeout_secs: u64) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 执行一条 Decision 指定的工具；任何失败路径都落到文本 ToolResult
    pub async fn execute(&self, wire_name: &str, args: Value) -> ToolResult {
        let start = Instant::now();
        let result = self.dispatch(wire_name, args.clone()).await;

        let outcome = match &result {
            ToolResult::Text(text) if text.starts_with("error in tool") => "error",
            ToolResult::Text(text) if text.starts_with("unknown tool") => "unknown",
            ToolResult::Text(_) | ToolResult::Screenshot { .. } => "ok",
            ToolResult::Halt { .. } => "halt",
        };
        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": wire_name,
            "outcome": outcome,
            "duration_ms": start.elapsed().as_millis() as u64,
            "args_preview": args_preview(&args),
        });
        tracing::info!(audit = %audit.to_string(), "tool");

        result
    }

    async fn dispatch(&self, wire_name: &str, args: Value) -> ToolResult {
        let name = match ToolName::from_wire(wire_name) {
            Some(name) => name,
            None => return ToolResult::Text(format!("unknown tool: {wire_name}")),
        };

        match name {
            ToolName::Stop => ToolResult::Halt {
                kind: HaltKind::Done,
                message: str_arg(&args, "message")
                    .unwrap_or_else(|| "task ended".to_string()),
            },
            ToolName::GiveValidCommand => ToolResult::Halt {
                kind: HaltKind::InvalidCommand,
                message: str_arg(&args, "reason")
                    .unwrap_or_else(|| "invalid command received".to_string()),
            },
            _ => self.run_automation(name, args).await,
        }
    }

    async fn run_automation(&self, name: ToolName, args: Value) -> ToolResult {
        let wire = name.as_wire();
        let tool = match self.registry.get(name) {
            Some(tool) => tool,
            None => return ToolResult::Text(format!("unknown tool: {wire}")),
        };

        match timeout(self.timeout, tool.execute(args)).await {
            Ok(Ok(ToolOutput::Text(text))) => ToolResult::Text(text),
            Ok(Ok(ToolOutput::Screenshot { png, width, height })) => {
                let image = ScreenImage { png, width, height };
                ToolResult::Screenshot {
                    note: "screenshot captured successfully".to_string(),
                    image,
                }
            }
            Ok(Err(e)) => ToolResult::Text(format!("error in tool({wire}) => {e}")),
            Err(_) => ToolResult::Text(format!(
                "error in tool({wire}) => timed out after {}s",
                self.timeout.as_secs()
            )),
        }
    }
}

fn str_arg(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn args_preview(args: &Value) -> String {
    let s = args.to_string();
    if s.len() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}
