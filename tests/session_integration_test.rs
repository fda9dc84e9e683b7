//! 会话集成测试：脚本化模型驱动完整编排循环

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;

    use mantis::core::AgentError;
    use mantis::llm::{LlmClient, ScriptedLlm};
    use mantis::memory::{History, Part, Role, Turn};
    use mantis::session::{session_loop, SessionStatus};
    use mantis::tools::{
        Tool, ToolExecutor, ToolName, ToolOutput, ToolRegistry,
    };

    /// 记录每次调用入参的桩工具
    struct RecordingTool {
        name: ToolName,
        calls: Arc<AtomicUsize>,
        last_args: Arc<Mutex<Option<Value>>>,
    }

    impl RecordingTool {
        fn new(name: ToolName) -> (Self, Arc<AtomicUsize>, Arc<Mutex<Option<Value>>>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let last_args = Arc::new(Mutex::new(None));
            (
                Self {
                    name,
                    calls: calls.clone(),
                    last_args: last_args.clone(),
                },
                calls,
                last_args,
            )
        }
    }

    #[async_trait]
    impl Tool for RecordingTool {
        fn name(&self) -> ToolName {
            self.name
        }

        fn description(&self) -> &str {
            "recording stub"
        }

        async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_args.lock().unwrap() = Some(args);
            Ok(ToolOutput::Text("ok".to_string()))
        }
    }

    /// 固定尺寸假截图工具
    struct FakeScreenTool;

    #[async_trait]
    impl Tool for FakeScreenTool {
        fn name(&self) -> ToolName {
            ToolName::GiveScreenshot
        }

        fn description(&self) -> &str {
            "fake screen"
        }

        async fn execute(&self, _args: Value) -> Result<ToolOutput, String> {
            Ok(ToolOutput::Screenshot {
                png: vec![9, 9, 9],
                width: 8,
                height: 4,
            })
        }
    }

    /// 永不停止的模型：每轮都要求再执行一次命令
    struct LoopingLlm {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmClient for LoopingLlm {
        async fn complete(
            &self,
            _system: &str,
            _history: &[Turn],
            _prompt: &str,
        ) -> Result<String, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(r#"{"tool":"execute_cmd_command","input_data":{"command":"echo again"},"next_command":"keep going"}"#.to_string())
        }
    }

    #[tokio::test]
    async fn test_open_website_then_stop() {
        let llm = ScriptedLlm::new(vec![
            r#"{"tool":"open_website","input_data":{"website":"https://www.youtube.com/"},"next_command":"stop agent"}"#,
            r#"{"tool":"stop","input_data":{"message":"Opened YouTube"},"next_command":"task ended"}"#,
        ]);
        let (tool, calls, last_args) = RecordingTool::new(ToolName::OpenWebsite);
        let mut registry = ToolRegistry::new();
        registry.register(tool);
        let executor = ToolExecutor::new(registry, 5);
        let mut history = History::new(30);

        let outcome = session_loop(
            &llm,
            &executor,
            &mut history,
            "system",
            "open youtube",
            25,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.status, SessionStatus::Halted);
        assert_eq!(outcome.summary, "Opened YouTube");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let args = last_args.lock().unwrap().clone().unwrap();
        assert_eq!(args["website"], "https://www.youtube.com/");
        // stop 之后不再问模型：脚本恰好耗尽
        assert_eq!(llm.remaining(), 0);
        // 历史：指令（仅一次）+ 工具结果 + 终止消息
        assert_eq!(history.len(), 3);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.turns()[1].role, Role::Model);
    }

    #[tokio::test]
    async fn test_malformed_output_aborts_without_tool_execution() {
        let llm = ScriptedLlm::new(vec!["I think I should open the browser."]);
        let (tool, calls, _) = RecordingTool::new(ToolName::OpenWebsite);
        let mut registry = ToolRegistry::new();
        registry.register(tool);
        let executor = ToolExecutor::new(registry, 5);
        let mut history = History::new(30);

        let err = session_loop(
            &llm,
            &executor,
            &mut history,
            "system",
            "open youtube",
            25,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AgentError::MalformedResponse(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_json_array_is_protocol_failure() {
        let llm = ScriptedLlm::new(vec![r#"[{"tool":"stop","input_data":{}}]"#]);
        let executor = ToolExecutor::new(ToolRegistry::new(), 5);
        let mut history = History::new(30);

        let err = session_loop(
            &llm,
            &executor,
            &mut history,
            "system",
            "do something",
            25,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_give_valid_command_halts_regardless_of_next_command() {
        let llm = ScriptedLlm::new(vec![
            r#"{"tool":"give_valid_command","input_data":{"reason":"Unrecognized command. Please provide a clear automation task."},"next_command":"keep going anyway"}"#,
            r#"{"tool":"stop","input_data":{"message":"should never be requested"},"next_command":"task ended"}"#,
        ]);
        let executor = ToolExecutor::new(ToolRegistry::new(), 5);
        let mut history = History::new(30);

        let outcome = session_loop(
            &llm,
            &executor,
            &mut history,
            "system",
            "asdfghjkl",
            25,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.status, SessionStatus::Halted);
        assert!(outcome.summary.contains("Unrecognized command"));
        // 立即终止：第二条脚本不被消费
        assert_eq!(llm.remaining(), 1);
    }

    #[tokio::test]
    async fn test_step_ceiling_forces_runaway_abort() {
        let llm = LoopingLlm {
            calls: AtomicUsize::new(0),
        };
        let (tool, calls, _) = RecordingTool::new(ToolName::ExecuteCmdCommand);
        let mut registry = ToolRegistry::new();
        registry.register(tool);
        let executor = ToolExecutor::new(registry, 5);
        let mut history = History::new(30);

        let err = session_loop(
            &llm,
            &executor,
            &mut history,
            "system",
            "loop forever",
            3,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AgentError::RunawayLoop(3)));
        // 每个完成的非终止迭代恰好一次模型调用与一次工具执行
        assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_screenshot_folds_into_user_turn() {
        let llm = ScriptedLlm::new(vec![
            r#"{"tool":"give_screenshot","input_data":{},"next_command":"click the close button"}"#,
            r#"{"tool":"stop","input_data":{"message":"done looking"},"next_command":"task ended"}"#,
        ]);
        let mut registry = ToolRegistry::new();
        registry.register(FakeScreenTool);
        let executor = ToolExecutor::new(registry, 5);
        let mut history = History::new(30);

        let outcome = session_loop(
            &llm,
            &executor,
            &mut history,
            "system",
            "what is on screen",
            25,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.status, SessionStatus::Halted);
        // 指令 turn + 截图 user turn + 终止 model turn
        let screenshot_turn = &history.turns()[1];
        assert_eq!(screenshot_turn.role, Role::User);
        match &screenshot_turn.parts[0] {
            Part::InlineImage { mime_type, data } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(data, &vec![9, 9, 9]);
            }
            _ => panic!("expected inline image first"),
        }
        match &screenshot_turn.parts[1] {
            Part::Text(note) => assert_eq!(note, "Screen dimensions: 8x4 pixels"),
            _ => panic!("expected dimensions note"),
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_recoverable() {
        let llm = ScriptedLlm::new(vec![
            r#"{"tool":"teleport_user","input_data":{},"next_command":"try something else"}"#,
            r#"{"tool":"stop","input_data":{"message":"gave up"},"next_command":"task ended"}"#,
        ]);
        let executor = ToolExecutor::new(ToolRegistry::new(), 5);
        let mut history = History::new(30);

        let outcome = session_loop(
            &llm,
            &executor,
            &mut history,
            "system",
            "do magic",
            25,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        // 未知工具不是协议错误：结果以文本回传，模型下一轮自行收尾
        assert_eq!(outcome.status, SessionStatus::Halted);
        assert_eq!(outcome.summary, "gave up");
        match &history.turns()[1].parts[0] {
            Part::Text(text) => assert_eq!(text, "unknown tool: teleport_user"),
            _ => panic!("expected text result"),
        }
    }

    #[tokio::test]
    async fn test_pre_cancelled_session_aborts_before_oracle_call() {
        let llm = ScriptedLlm::new(vec![
            r#"{"tool":"stop","input_data":{"message":"unreachable"},"next_command":"task ended"}"#,
        ]);
        let executor = ToolExecutor::new(ToolRegistry::new(), 5);
        let mut history = History::new(30);
        let token = CancellationToken::new();
        token.cancel();

        let err = session_loop(
            &llm,
            &executor,
            &mut history,
            "system",
            "open youtube",
            25,
            token,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AgentError::Cancelled));
        assert_eq!(llm.remaining(), 1);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_run_session_maps_protocol_failure_to_aborted() {
        let components = mantis::AgentComponents {
            llm: Arc::new(ScriptedLlm::new(vec!["definitely not json"])),
            executor: ToolExecutor::new(ToolRegistry::new(), 5),
            system_prompt: "system".to_string(),
            working_dir: std::env::temp_dir(),
            max_steps: 5,
            max_history_turns: 30,
        };
        let outcome =
            mantis::run_session(&components, "open youtube", CancellationToken::new()).await;
        assert_eq!(outcome.status, SessionStatus::Aborted);
        // 对外只给一行诊断，不带原始模型输出
        assert!(outcome.summary.contains("malformed"));
        assert!(!outcome.summary.contains("definitely not json"));
    }

    #[tokio::test]
    async fn test_history_capped_during_long_session() {
        let llm = LoopingLlm {
            calls: AtomicUsize::new(0),
        };
        let (tool, _, _) = RecordingTool::new(ToolName::ExecuteCmdCommand);
        let mut registry = ToolRegistry::new();
        registry.register(tool);
        let executor = ToolExecutor::new(registry, 5);
        let mut history = History::new(4);

        let err = session_loop(
            &llm,
            &executor,
            &mut history,
            "system",
            "loop forever",
            20,
            CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AgentError::RunawayLoop(20)));
        assert!(history.len() <= 4);
    }
}
