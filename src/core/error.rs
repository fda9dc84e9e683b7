//! Agent 错误类型
//!
//! 只有协议级失败才是 AgentError：模型输出不合法、模型调用失败、步数失控、外部取消。
//! 工具级失败不在此列——Executor 把它们归一化为文本结果回传给模型，会话继续。

use thiserror::Error;

/// 会话运行过程中的致命错误（协议层面；工具失败不经过这里）
#[derive(Error, Debug)]
pub enum AgentError {
    /// 模型输出无法解析为合法 Decision；携带原始文本供诊断
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    /// 步数达到硬上限仍未收到 stop（防失控），与正常 HALTED 区分
    #[error("Runaway loop: step ceiling {0} reached")]
    RunawayLoop(usize),

    #[error("Cancelled by caller")]
    Cancelled,

    #[error("Config error: {0}")]
    ConfigError(String),
}
