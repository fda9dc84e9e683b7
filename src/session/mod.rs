//! 会话层：Decision 解析、system prompt 构建、编排主循环

pub mod loop_;
pub mod parser;
pub mod prompt;

pub use loop_::{session_loop, SessionOutcome, SessionStatus};
pub use parser::{parse_decision, Decision};
pub use prompt::build_system_prompt;
