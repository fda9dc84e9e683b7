//! 记忆层：会话内对话历史（文本 / 内联图片），带轮数上限

pub mod history;

pub use history::{History, Part, Role, Turn};
