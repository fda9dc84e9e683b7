//! 工具箱：桌面自动化原语与统一执行器
//!
//! 所有工具实现 Tool trait，由 ToolRegistry 按 ToolName 注册查找；
//! ToolExecutor 负责统一调用、超时与"失败归一化为文本"，永不向上抛错。

pub mod desktop;
pub mod executor;
pub mod files;
pub mod keyboard;
pub mod mouse;
pub mod outcome;
pub mod registry;
pub mod screen;
pub mod shell;

pub use desktop::{OpenAppTool, OpenWebsiteTool};
pub use executor::ToolExecutor;
pub use files::{OpenFileTool, WriteFileTool};
pub use keyboard::{PressKeysTool, TypeTextTool};
pub use mouse::{ClickMouseTool, MoveMouseTool};
pub use outcome::{HaltKind, ScreenImage, ToolResult};
pub use registry::{Tool, ToolName, ToolOutput, ToolRegistry};
pub use screen::ScreenshotTool;
pub use shell::CmdTool;
