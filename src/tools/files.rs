//! 文件工具：写入文件（write_into_file）、用默认应用打开文件（open_file）
//!
//! 相对路径以会话工作目录为根解析；写入前自动创建父目录。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::tools::{Tool, ToolName, ToolOutput};

/// 以工作目录为根解析（绝对路径原样返回）
fn resolve(working_dir: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}

fn path_arg(args: &Value, key: &str) -> Result<String, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing required key '{key}'"))
}

/// 文件写入工具：write_into_file
pub struct WriteFileTool {
    working_dir: PathBuf,
}

impl WriteFileTool {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> ToolName {
        ToolName::WriteIntoFile
    }

    fn description(&self) -> &str {
        "Write text content into a file, creating parent directories as needed."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Target file path (relative paths resolve against the working directory)"
                },
                "content": {
                    "type": "string",
                    "description": "Full text content to write"
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
        let file_path = path_arg(&args, "file_path")?;
        let content = args
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "missing required key 'content'".to_string())?;

        let path = resolve(&self.working_dir, &file_path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("create_dir_all failed: {e}"))?;
        }
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| format!("write failed: {e}"))?;

        tracing::info!(path = %path.display(), bytes = content.len(), "write_into_file");
        Ok(ToolOutput::Text(format!(
            "{} written successfully",
            path.display()
        )))
    }
}

/// 文件打开工具：open_file，交给操作系统默认应用
pub struct OpenFileTool {
    working_dir: PathBuf,
}

impl OpenFileTool {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

#[async_trait]
impl Tool for OpenFileTool {
    fn name(&self) -> ToolName {
        ToolName::OpenFile
    }

    fn description(&self) -> &str {
        "Open a file with its default application."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to open"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
        let file_path = path_arg(&args, "file_path")?;
        let path = resolve(&self.working_dir, &file_path);
        if !path.exists() {
            return Err(format!("file not found: {}", path.display()));
        }
        open::that_detached(&path).map_err(|e| format!("open failed: {e}"))?;
        Ok(ToolOutput::Text(format!(
            "{} file opened successfully",
            path.display()
        )))
    }
}
