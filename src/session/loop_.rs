//! 编排主循环
//!
//! 显式迭代状态机（不递归）：问模型要 Decision -> 解析 -> 执行工具 -> 结果写回历史，
//! 直到控制面终止（stop / give_valid_command）或步数上限。协议级失败（输出不合法、
//! 模型调用失败）立即终止且不重试；工具级失败只是文本结果，循环继续。
//! 外部取消在迭代之间检查，不打断正在执行的工具（避免留下按住的键等不一致状态）。

use tokio_util::sync::CancellationToken;

use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::memory::{History, Part, Turn};
use crate::session::parse_decision;
use crate::tools::{HaltKind, ToolExecutor, ToolResult};

/// 会话终态：正常收尾（模型调用 stop / give_valid_command）或中止
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Halted,
    Aborted,
}

/// 对外会话结果：终态 + 一行总结（不跨边界暴露原始错误细节）
#[derive(Clone, Debug)]
pub struct SessionOutcome {
    pub status: SessionStatus,
    pub summary: String,
}

/// 执行一次会话：单指令驱动的有界工具链
///
/// - 原始指令只在第一轮之后入史一次；后续轮次以 Decision.next_command 作为新提示，
///   提示本身不回写历史（与模型的 send_message 语义一致）
/// - 截图结果作为下一条 user Turn 写回（图片 + 尺寸说明），其余结果为 model Turn
/// - 返回 Err 的都是协议/安全级失败，由调用方统一映射为 Aborted
pub async fn session_loop(
    llm: &dyn LlmClient,
    executor: &ToolExecutor,
    history: &mut History,
    system_prompt: &str,
    instruction: &str,
    max_steps: usize,
    cancel_token: CancellationToken,
) -> Result<SessionOutcome, AgentError> {
    let mut prompt = instruction.to_string();
    let mut step: usize = 0;

    loop {
        if cancel_token.is_cancelled() {
            return Err(AgentError::Cancelled);
        }
        if step >= max_steps {
            return Err(AgentError::RunawayLoop(max_steps));
        }

        tracing::debug!(step, prompt = %prompt, "asking model for next decision");
        let raw = llm
            .complete(system_prompt, history.turns(), &prompt)
            .await
            .map_err(AgentError::LlmError)?;

        if step == 0 {
            history.push(Turn::user_text(instruction));
        }

        // 解析失败是致命的：不自动重问，第二次不合法输出会无界递归
        let decision = parse_decision(&raw)?;
        tracing::info!(step, tool = %decision.tool, "decision");

        let result = executor
            .execute(&decision.tool, decision.input_data.clone())
            .await;

        match result {
            ToolResult::Halt { kind, message } => {
                if kind == HaltKind::Done {
                    history.push(Turn::model_text(&message));
                }
                tracing::info!(step, ?kind, summary = %message, "session halted");
                return Ok(SessionOutcome {
                    status: SessionStatus::Halted,
                    summary: message,
                });
            }
            ToolResult::Text(text) => {
                history.push(Turn::model_text(text));
            }
            ToolResult::Screenshot { note, image } => {
                tracing::info!(step, width = image.width, height = image.height, %note, "screenshot");
                let dims = image.dimensions_note();
                history.push(Turn::user_parts(vec![
                    Part::InlineImage {
                        mime_type: "image/png".to_string(),
                        data: image.png,
                    },
                    Part::text(dims),
                ]));
            }
        }

        step += 1;
        prompt = decision.next_command;
    }
}
