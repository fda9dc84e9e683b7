//! Agent 运行时
//!
//! 组件装配与对外会话入口：create_agent_components 按配置构建 LLM 客户端、
//! 工具注册表、执行器与 system prompt；run_session 对单条指令跑编排循环并把
//! 协议级失败统一映射为 Aborted（细节进日志，不跨会话边界暴露）。
//! 并发约定：同一时刻只跑一个会话，由调用方保证（键鼠/前台窗口是独占资源）。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::core::AgentError;
use crate::llm::{GeminiClient, LlmClient, MockLlmClient};
use crate::memory::History;
use crate::session::{build_system_prompt, session_loop, SessionOutcome, SessionStatus};
use crate::tools::{
    ClickMouseTool, CmdTool, MoveMouseTool, OpenAppTool, OpenFileTool, OpenWebsiteTool,
    PressKeysTool, ScreenshotTool, ToolExecutor, ToolRegistry, TypeTextTool, WriteFileTool,
};

/// 预构建的 Agent 组件：LLM、执行器、system prompt 与会话边界，可跨会话复用
pub struct AgentComponents {
    pub llm: Arc<dyn LlmClient>,
    pub executor: ToolExecutor,
    pub system_prompt: String,
    pub working_dir: PathBuf,
    pub max_steps: usize,
    pub max_history_turns: usize,
}

/// 按配置选择 LLM 后端：有 GEMINI_API_KEY 且 provider 非 mock 时走 Gemini，否则 Mock
pub(crate) fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    match std::env::var("GEMINI_API_KEY") {
        Ok(key) if provider != "mock" => {
            tracing::info!("Using Gemini LLM ({})", cfg.llm.model);
            Arc::new(GeminiClient::new(
                key,
                cfg.llm.model.clone(),
                cfg.llm.generation.clone(),
                cfg.llm.request_timeout_secs,
            ))
        }
        _ => {
            tracing::warn!("No GEMINI_API_KEY set or provider=mock, using Mock LLM");
            Arc::new(MockLlmClient)
        }
    }
}

/// 创建 Agent 组件：注册全部自动化工具并生成与之一致的 system prompt
pub fn create_agent_components(cfg: &AppConfig, working_dir: &Path) -> AgentComponents {
    let llm = create_llm_from_config(cfg);

    let mut tools = ToolRegistry::new();
    tools.register(CmdTool::new(working_dir, cfg.tools.tool_timeout_secs));
    tools.register(WriteFileTool::new(working_dir));
    tools.register(OpenFileTool::new(working_dir));
    tools.register(OpenAppTool);
    tools.register(OpenWebsiteTool);
    tools.register(PressKeysTool::new(cfg.tools.key_interval_ms));
    tools.register(TypeTextTool);
    tools.register(ScreenshotTool);
    tools.register(MoveMouseTool);
    tools.register(ClickMouseTool::new(cfg.tools.click_interval_ms));

    let system_prompt = build_system_prompt(working_dir, &tools);

    AgentComponents {
        llm,
        executor: ToolExecutor::new(tools, cfg.tools.tool_timeout_secs),
        system_prompt,
        working_dir: working_dir.to_path_buf(),
        max_steps: cfg.app.max_steps,
        max_history_turns: cfg.app.max_history_turns,
    }
}

/// 对单条指令执行一个完整会话；历史为会话私有（1:1），结束即销毁
pub async fn run_session(
    components: &AgentComponents,
    instruction: &str,
    cancel_token: CancellationToken,
) -> SessionOutcome {
    let mut history = History::new(components.max_history_turns);
    tracing::info!(instruction = %instruction, working_dir = %components.working_dir.display(), "session start");

    let result = session_loop(
        components.llm.as_ref(),
        &components.executor,
        &mut history,
        &components.system_prompt,
        instruction,
        components.max_steps,
        cancel_token,
    )
    .await;

    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "session aborted");
            SessionOutcome {
                status: SessionStatus::Aborted,
                summary: abort_summary(&e),
            }
        }
    }
}

/// 对外诊断摘要：按错误类别给一行说明，不携带原始负载
fn abort_summary(err: &AgentError) -> String {
    match err {
        AgentError::MalformedResponse(_) => {
            "session aborted: model produced malformed output".to_string()
        }
        AgentError::LlmError(_) => "session aborted: language model call failed".to_string(),
        AgentError::RunawayLoop(limit) => {
            format!("session aborted: step ceiling ({limit}) reached without stop")
        }
        AgentError::Cancelled => "session aborted: cancelled by caller".to_string(),
        AgentError::ConfigError(_) => "session aborted: configuration error".to_string(),
    }
}
