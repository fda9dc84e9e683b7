//! 键盘工具：press_keyboard_key（组合键）、write_content（光标处输入文本）
//!
//! 键注入经 enigo（阻塞 API），放到 spawn_blocking 中执行。组合键按给定顺序
//! 依次按下、再逆序释放，键间留间隔，避免目标应用丢事件。

use async_trait::async_trait;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use serde_json::Value;

use crate::tools::{Tool, ToolName, ToolOutput};

/// 键名映射：常用修饰键/功能键按名解析，单字符落到 Unicode 键
fn key_from_name(name: &str) -> Result<Key, String> {
    let lower = name.trim().to_lowercase();
    let key = match lower.as_str() {
        "ctrl" | "control" => Key::Control,
        "shift" => Key::Shift,
        "alt" => Key::Alt,
        "win" | "cmd" | "meta" | "super" => Key::Meta,
        "enter" | "return" => Key::Return,
        "esc" | "escape" => Key::Escape,
        "tab" => Key::Tab,
        "space" => Key::Space,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" | "page_up" => Key::PageUp,
        "pagedown" | "page_down" => Key::PageDown,
        "up" => Key::UpArrow,
        "down" => Key::DownArrow,
        "left" => Key::LeftArrow,
        "right" => Key::RightArrow,
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Unicode(c),
                _ => return Err(format!("unknown key name: {name}")),
            }
        }
    };
    Ok(key)
}

/// 组合键工具：press_keyboard_key
pub struct PressKeysTool {
    key_interval_ms: u64,
}

impl PressKeysTool {
    pub fn new(key_interval_ms: u64) -> Self {
        Self { key_interval_ms }
    }
}

#[async_trait]
impl Tool for PressKeysTool {
    fn name(&self) -> ToolName {
        ToolName::PressKeyboardKey
    }

    fn description(&self) -> &str {
        "Press one or more keyboard keys together (pressed in order, released in reverse)."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "keys_to_press": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Ordered key names, e.g. [\"ctrl\", \"shift\", \"esc\"]"
                }
            },
            "required": ["keys_to_press"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
        let names: Vec<String> = args
            .get("keys_to_press")
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str())
                    .map(String::from)
                    .collect()
            })
            .ok_or_else(|| "missing required key 'keys_to_press'".to_string())?;
        if names.is_empty() {
            return Err("keys_to_press is empty".to_string());
        }

        let keys = names
            .iter()
            .map(|n| key_from_name(n))
            .collect::<Result<Vec<Key>, String>>()?;

        let interval = std::time::Duration::from_millis(self.key_interval_ms);
        tokio::task::spawn_blocking(move || -> Result<(), String> {
            let mut enigo =
                Enigo::new(&Settings::default()).map_err(|e| format!("input backend: {e}"))?;
            for key in &keys {
                enigo
                    .key(*key, Direction::Press)
                    .map_err(|e| format!("key press failed: {e}"))?;
                std::thread::sleep(interval);
            }
            for key in keys.iter().rev() {
                enigo
                    .key(*key, Direction::Release)
                    .map_err(|e| format!("key release failed: {e}"))?;
                std::thread::sleep(interval);
            }
            Ok(())
        })
        .await
        .map_err(|e| format!("input task panicked: {e}"))??;

        Ok(ToolOutput::Text(format!(
            "{names:?} pressed successfully"
        )))
    }
}

/// 文本输入工具：write_content
pub struct TypeTextTool;

#[async_trait]
impl Tool for TypeTextTool {
    fn name(&self) -> ToolName {
        ToolName::WriteContent
    }

    fn description(&self) -> &str {
        "Type text at the current cursor position."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "Text to type"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
        let content = args
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "missing required key 'content'".to_string())?
            .to_string();

        tokio::task::spawn_blocking(move || -> Result<(), String> {
            let mut enigo =
                Enigo::new(&Settings::default()).map_err(|e| format!("input backend: {e}"))?;
            enigo
                .text(&content)
                .map_err(|e| format!("typing failed: {e}"))
        })
        .await
        .map_err(|e| format!("input task panicked: {e}"))??;

        Ok(ToolOutput::Text("content written successfully".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_names() {
        assert!(matches!(key_from_name("ctrl"), Ok(Key::Control)));
        assert!(matches!(key_from_name("Shift"), Ok(Key::Shift)));
        assert!(matches!(key_from_name("esc"), Ok(Key::Escape)));
        assert!(matches!(key_from_name("enter"), Ok(Key::Return)));
    }

    #[test]
    fn test_single_char_falls_back_to_unicode() {
        assert!(matches!(key_from_name("a"), Ok(Key::Unicode('a'))));
        assert!(matches!(key_from_name("Z"), Ok(Key::Unicode('z'))));
    }

    #[test]
    fn test_unknown_multi_char_name_is_error() {
        assert!(key_from_name("hyperdrive").is_err());
        assert!(key_from_name("").is_err());
    }
}
