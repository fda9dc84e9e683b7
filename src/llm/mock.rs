//! Mock LLM 客户端（用于测试与无 API Key 场景）
//!
//! MockLlmClient 对任意输入回一条 stop Decision，保证会话立即正常收尾；
//! ScriptedLlm 按预置脚本依次出队回复，供集成测试驱动完整会话。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::LlmClient;
use crate::memory::Turn;

/// Mock 客户端：始终返回 stop Decision（消息中回显本轮提示）
#[derive(Debug, Default)]
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(
        &self,
        _system: &str,
        _history: &[Turn],
        prompt: &str,
    ) -> Result<String, String> {
        // 经 json! 构造，提示文本中的引号、反斜杠、换行都被正确转义
        let reply = serde_json::json!({
            "tool": "stop",
            "input_data": {
                "message": format!("Mock LLM: no action taken for '{prompt}'")
            },
            "next_command": "task ended"
        });
        Ok(reply.to_string())
    }
}

/// 脚本化客户端：每次调用弹出队首回复；脚本耗尽后退化为 stop Decision
#[derive(Debug, Default)]
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
        }
    }

    /// 剩余未消费的脚本条数（断言"stop 后不再调用模型"等性质）
    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(
        &self,
        _system: &str,
        _history: &[Turn],
        _prompt: &str,
    ) -> Result<String, String> {
        let next = self
            .responses
            .lock()
            .map_err(|_| "scripted llm lock poisoned".to_string())?
            .pop_front();
        Ok(next.unwrap_or_else(|| {
            r#"{"tool": "stop", "input_data": {"message": "script exhausted"}, "next_command": "task ended"}"#
                .to_string()
        }))
    }
}
