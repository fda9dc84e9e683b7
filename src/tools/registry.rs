//! 工具注册表
//!
//! ToolName 是封闭的标识符集合：边界上用与模型约定的字符串（wire id），内部用枚举，
//! 未知标识符在 from_wire 单点处理。自动化工具实现 Tool trait 并注册到 ToolRegistry；
//! give_valid_command / stop 是控制面标识符，不注册，由 ToolExecutor 直接识别。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// 已知工具标识符（含控制面）；边界序列化统一走 as_wire / from_wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolName {
    ExecuteCmdCommand,
    WriteIntoFile,
    OpenFile,
    OpenApp,
    OpenWebsite,
    PressKeyboardKey,
    WriteContent,
    GiveScreenshot,
    MoveMousePointer,
    ClickMouseButtons,
    /// 控制面：指令不可执行，携带一行原因
    GiveValidCommand,
    /// 控制面：任务完成，携带一行总结
    Stop,
}

impl ToolName {
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "execute_cmd_command" => Some(Self::ExecuteCmdCommand),
            "write_into_file" => Some(Self::WriteIntoFile),
            "open_file" => Some(Self::OpenFile),
            "open_app" => Some(Self::OpenApp),
            "open_website" => Some(Self::OpenWebsite),
            "press_keyboard_key" => Some(Self::PressKeyboardKey),
            "write_content" => Some(Self::WriteContent),
            "give_screenshot" => Some(Self::GiveScreenshot),
            "move_mouse_pointer" => Some(Self::MoveMousePointer),
            "click_mouse_buttons" => Some(Self::ClickMouseButtons),
            "give_valid_command" => Some(Self::GiveValidCommand),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::ExecuteCmdCommand => "execute_cmd_command",
            Self::WriteIntoFile => "write_into_file",
            Self::OpenFile => "open_file",
            Self::OpenApp => "open_app",
            Self::OpenWebsite => "open_website",
            Self::PressKeyboardKey => "press_keyboard_key",
            Self::WriteContent => "write_content",
            Self::GiveScreenshot => "give_screenshot",
            Self::MoveMousePointer => "move_mouse_pointer",
            Self::ClickMouseButtons => "click_mouse_buttons",
            Self::GiveValidCommand => "give_valid_command",
            Self::Stop => "stop",
        }
    }

    /// 控制面标识符不执行自动化动作，由 Executor 转成终止哨兵
    pub fn is_control(&self) -> bool {
        matches!(self, Self::GiveValidCommand | Self::Stop)
    }
}

/// 工具执行产物：文本结论，或截图（PNG 字节 + 像素尺寸）
#[derive(Clone, Debug)]
pub enum ToolOutput {
    Text(String),
    Screenshot {
        png: Vec<u8>,
        width: u32,
        height: u32,
    },
}

/// 工具 trait：标识符、描述（供模型理解）、参数 schema、异步执行（args 为 JSON）
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> ToolName;

    fn description(&self) -> &str;

    /// 参数 JSON Schema（进入 system prompt，供模型生成正确的 input_data）
    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String>;
}

/// 工具注册表：按 ToolName 存储 Arc<dyn Tool>
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<ToolName, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name(), Arc::new(tool));
    }

    pub fn get(&self, name: ToolName) -> Option<Arc<dyn Tool>> {
        self.tools.get(&name).cloned()
    }

    pub fn tool_names(&self) -> Vec<ToolName> {
        self.tools.keys().copied().collect()
    }

    /// 生成工具 schema JSON（wire id + 描述 + 参数 schema），用于 system prompt
    pub fn to_schema_json(&self) -> String {
        let mut tools: Vec<serde_json::Value> = self
            .tools
            .iter()
            .map(|(name, tool)| {
                serde_json::json!({
                    "name": name.as_wire(),
                    "description": tool.description(),
                    "parameters": tool.parameters_schema()
                })
            })
            .collect();
        tools.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
        serde_json::to_string_pretty(&tools).unwrap_or_else(|_| "[]".to_string())
    }
}
