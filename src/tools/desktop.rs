//! 应用与网址工具：open_app（按名启动应用）、open_website（默认浏览器打开 URL）

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use crate::tools::{Tool, ToolName, ToolOutput};

fn str_arg(args: &Value, key: &str) -> Result<String, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing required key '{key}'"))
}

/// 应用启动工具：open_app
pub struct OpenAppTool;

#[async_trait]
impl Tool for OpenAppTool {
    fn name(&self) -> ToolName {
        ToolName::OpenApp
    }

    fn description(&self) -> &str {
        "Launch an application by name (e.g. \"notepad\", \"firefox\")."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "app_name": {
                    "type": "string",
                    "description": "Name of the application to launch"
                }
            },
            "required": ["app_name"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
        let app_name = str_arg(&args, "app_name")?;

        // Windows 经 start 解析别名与注册路径；macOS 走 open -a；其余平台直接 spawn
        let spawned = if cfg!(target_os = "windows") {
            Command::new("cmd")
                .args(["/C", "start", ""])
                .arg(&app_name)
                .spawn()
        } else if cfg!(target_os = "macos") {
            Command::new("open").arg("-a").arg(&app_name).spawn()
        } else {
            Command::new(&app_name).spawn()
        };

        spawned.map_err(|e| format!("failed to launch '{app_name}': {e}"))?;
        Ok(ToolOutput::Text(format!("{app_name} opened successfully")))
    }
}

/// 网址打开工具：open_website
pub struct OpenWebsiteTool;

#[async_trait]
impl Tool for OpenWebsiteTool {
    fn name(&self) -> ToolName {
        ToolName::OpenWebsite
    }

    fn description(&self) -> &str {
        "Open a URL in the default web browser."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "website": {
                    "type": "string",
                    "description": "Full URL including scheme, e.g. https://www.youtube.com/"
                }
            },
            "required": ["website"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
        let website = str_arg(&args, "website")?;
        if !website.starts_with("http://") && !website.starts_with("https://") {
            return Err(format!("not a http(s) URL: {website}"));
        }
        open::that_detached(&website).map_err(|e| format!("open failed: {e}"))?;
        Ok(ToolOutput::Text(format!("{website} has opened successfully")))
    }
}
