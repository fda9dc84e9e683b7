//! LLM 客户端抽象
//!
//! 模型被当作黑盒决策函数：输入为 system 指令 + 有序历史（文本/图片 Turn）+ 本轮提示，
//! 输出为单条完整文本（协议不含流式/分片响应）。

use async_trait::async_trait;

use crate::memory::Turn;

/// LLM 客户端 trait：一次调用返回一条完整回复文本
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// prompt 为本轮新提示，单独传入、不属于 history（是否入史由调用方决定）
    async fn complete(
        &self,
        system: &str,
        history: &[Turn],
        prompt: &str,
    ) -> Result<String, String>;
}
