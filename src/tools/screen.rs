//! 截图工具：give_screenshot
//!
//! 经 xcap 抓取主屏幕，编码为 PNG 并附带像素尺寸。编排循环把图片作为下一条
//! user Turn 写回历史（模型的下一步推理需要它作为输入）。

use std::io::Cursor;

use async_trait::async_trait;
use serde_json::Value;
use xcap::Monitor;

use crate::tools::{Tool, ToolName, ToolOutput};

/// 屏幕捕获工具：give_screenshot
pub struct ScreenshotTool;

#[async_trait]
impl Tool for ScreenshotTool {
    fn name(&self) -> ToolName {
        ToolName::GiveScreenshot
    }

    fn description(&self) -> &str {
        "Capture the full screen as a PNG image with its pixel dimensions. Call this before any mouse action that depends on screen content."
    }

    async fn execute(&self, _args: Value) -> Result<ToolOutput, String> {
        let output = tokio::task::spawn_blocking(|| -> Result<ToolOutput, String> {
            let monitor = Monitor::all()
                .map_err(|e| format!("monitor enumeration failed: {e}"))?
                .into_iter()
                .next()
                .ok_or_else(|| "no monitor found".to_string())?;
            let image = monitor
                .capture_image()
                .map_err(|e| format!("capture failed: {e}"))?;
            let (width, height) = (image.width(), image.height());

            let mut buf = Cursor::new(Vec::new());
            image
                .write_to(&mut buf, xcap::image::ImageFormat::Png)
                .map_err(|e| format!("png encoding failed: {e}"))?;

            Ok(ToolOutput::Screenshot {
                png: buf.into_inner(),
                width,
                height,
            })
        })
        .await
        .map_err(|e| format!("capture task panicked: {e}"))??;

        Ok(output)
    }
}
