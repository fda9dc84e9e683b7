//! 模型输出解析
//!
//! 模型被要求只输出一个 JSON 对象，但不被信任：先剥掉可能的 Markdown 围栏
//! （带或不带语言标签），再解析为 Decision。缺 tool / input_data、语法错误、
//! input_data 不是 JSON 对象，都是协议级失败（MalformedResponse，附原始文本），
//! 不重试。对象内部的键形状在这里不校验，那是各工具的职责。

use serde::Deserialize;
use serde_json::Value;

use crate::core::AgentError;

/// 模型每轮输出的结构化决策
#[derive(Clone, Debug, Deserialize)]
pub struct Decision {
    /// 工具 wire 标识符（含控制面 give_valid_command / stop）
    pub tool: String,
    /// 工具入参，必须是 JSON 对象；键形状因工具而异
    pub input_data: Value,
    /// 下一轮提示文本；缺省为空（终止型 Decision 常省略）
    #[serde(default)]
    pub next_command: String,
}

/// 剥掉可选的首尾围栏标记（```json / ```）
fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// 解析原始模型输出为 Decision；失败附原始文本供诊断
pub fn parse_decision(raw: &str) -> Result<Decision, AgentError> {
    let text = strip_fences(raw);
    let decision = serde_json::from_str::<Decision>(text).map_err(|e| {
        AgentError::MalformedResponse(format!("{e}; raw output: {}", preview(raw)))
    })?;
    if !decision.input_data.is_object() {
        return Err(AgentError::MalformedResponse(format!(
            "input_data must be a JSON object; raw output: {}",
            preview(raw)
        )));
    }
    Ok(decision)
}

fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() > 300 {
        format!("{}...", trimmed.chars().take(300).collect::<String>())
    } else {
        trimmed.to_string()
    }
}
