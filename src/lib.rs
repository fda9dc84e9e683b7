//! Mantis - Rust 桌面自动化智能体
//!
//! 单条自然语言指令驱动一串由模型自主选择的桌面操作。模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 会话错误类型
//! - **llm**: LLM 客户端抽象与实现（Gemini / Mock）
//! - **memory**: 会话历史（文本/图片 Turn，带轮数上限）
//! - **runtime**: 组件装配与对外会话入口
//! - **session**: Decision 解析、system prompt、编排主循环
//! - **tools**: 自动化工具箱（命令、文件、应用、键鼠、截图）与统一执行器
//!
//! 语音采集 / TTS / 图形外壳是外部协作方：它们一次只递交一条指令，
//! 并在上一个会话终止前不提交下一条。

pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod runtime;
pub mod session;
pub mod tools;

pub use runtime::{create_agent_components, run_session, AgentComponents};
pub use session::{SessionOutcome, SessionStatus};
