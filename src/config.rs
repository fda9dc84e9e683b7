//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `MANTIS__*` 覆盖（双下划线表示嵌套，
//! 如 `MANTIS__APP__MAX_STEPS=40`）。API Key 只从环境变量 GEMINI_API_KEY 读取。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub tools: ToolsSection,
}

/// [app] 段：工作目录与会话边界
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    /// 会话工作目录，未设置时用进程当前目录
    pub working_dir: Option<PathBuf>,
    /// 历史保留条数上限 H（按 Turn 计，超出时从最旧端成对剪枝）
    pub max_history_turns: usize,
    /// 单会话模型调用步数硬上限（防失控）
    pub max_steps: usize,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "mantis".to_string(),
            working_dir: None,
            max_history_turns: 30,
            max_steps: 25,
        }
    }
}

/// [llm] 段：后端选择、模型名、生成参数与请求超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端：gemini / mock；无 GEMINI_API_KEY 时自动退化为 mock
    pub provider: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub generation: GenerationSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: crate::llm::gemini::GEMINI_FLASH.to_string(),
            request_timeout_secs: 60,
            generation: GenerationSection::default(),
        }
    }
}

/// [llm.generation] 段：采样参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationSection {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

/// [tools] 段：工具超时与键鼠注入间隔
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// 单次工具调用超时（秒）
    pub tool_timeout_secs: u64,
    /// 组合键按下/释放之间的间隔（毫秒）
    pub key_interval_ms: u64,
    /// 连击之间的间隔（毫秒）
    pub click_interval_ms: u64,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            tool_timeout_secs: 30,
            key_interval_ms: 50,
            click_interval_ms: 100,
        }
    }
}

/// 从 config 目录加载配置，环境变量 MANTIS__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 MANTIS__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("MANTIS")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.app.max_history_turns, 30);
        assert_eq!(cfg.app.max_steps, 25);
        assert_eq!(cfg.llm.provider, "gemini");
        assert_eq!(cfg.tools.tool_timeout_secs, 30);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[app]\nmax_steps = 7\n").unwrap();
        let cfg = load_config(Some(path)).unwrap();
        assert_eq!(cfg.app.max_steps, 7);
        assert_eq!(cfg.app.max_history_turns, 30);
    }
}
