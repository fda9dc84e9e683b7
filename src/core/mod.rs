//! 核心层：会话错误类型

pub mod error;

pub use error::AgentError;
