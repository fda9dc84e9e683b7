//! 工具执行结果的归一化表示
//!
//! Executor 的所有出口都收敛到 ToolResult：文本结论（成功或失败描述）、
//! 截图（文本 + 图片字节 + 像素尺寸）、或控制面终止哨兵。

/// 截图产物：PNG 字节与像素尺寸
#[derive(Clone, Debug)]
pub struct ScreenImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ScreenImage {
    /// 编排循环写回历史时附带的尺寸说明（模型据此计算鼠标坐标）
    pub fn dimensions_note(&self) -> String {
        format!("Screen dimensions: {}x{} pixels", self.width, self.height)
    }
}

/// 终止哨兵类型：任务完成（stop）或指令不可执行（give_valid_command）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltKind {
    Done,
    InvalidCommand,
}

/// 归一化工具结果：Executor 永不抛错，失败也以 Text 形式回传给模型
#[derive(Clone, Debug)]
pub enum ToolResult {
    Text(String),
    Screenshot { note: String, image: ScreenImage },
    /// 控制面哨兵：编排循环据此终止会话，message 作为对外总结
    Halt { kind: HaltKind, message: String },
}
