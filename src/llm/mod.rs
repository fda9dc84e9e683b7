//! LLM 客户端抽象与实现（Gemini / Mock）

pub mod gemini;
pub mod mock;
pub mod traits;

pub use gemini::GeminiClient;
pub use mock::{MockLlmClient, ScriptedLlm};
pub use traits::LlmClient;
