//! 鼠标工具：move_mouse_pointer（按屏幕比例移动）、click_mouse_buttons（点击）
//!
//! 坐标以屏幕宽高的比例给出（模型结合截图尺寸计算），越界值钳位到 [0,1]
//! 而不是报错，避免模型的轻微偏差中断会话。

use async_trait::async_trait;
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use serde_json::Value;

use crate::tools::{Tool, ToolName, ToolOutput};

/// 比例坐标钳位到 [0,1]（NaN 归 0）
fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// 比例坐标换算为像素坐标
fn to_pixels(x: f64, y: f64, width: i32, height: i32) -> (i32, i32) {
    let px = (clamp_unit(x) * width as f64).round() as i32;
    let py = (clamp_unit(y) * height as f64).round() as i32;
    (px.clamp(0, width.max(1) - 1), py.clamp(0, height.max(1) - 1))
}

fn float_arg(args: &Value, key: &str) -> Result<f64, String> {
    args.get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| format!("missing or non-numeric key '{key}'"))
}

/// 指针移动工具：move_mouse_pointer
pub struct MoveMouseTool;

#[async_trait]
impl Tool for MoveMouseTool {
    fn name(&self) -> ToolName {
        ToolName::MoveMousePointer
    }

    fn description(&self) -> &str {
        "Move the mouse pointer to a position given as fractions of screen width/height in [0,1]."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "x": {
                    "type": "number",
                    "description": "Horizontal position as a fraction of screen width, 0.0 = left, 1.0 = right"
                },
                "y": {
                    "type": "number",
                    "description": "Vertical position as a fraction of screen height, 0.0 = top, 1.0 = bottom"
                }
            },
            "required": ["x", "y"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
        let x = float_arg(&args, "x")?;
        let y = float_arg(&args, "y")?;

        let (px, py) = tokio::task::spawn_blocking(move || -> Result<(i32, i32), String> {
            let mut enigo =
                Enigo::new(&Settings::default()).map_err(|e| format!("input backend: {e}"))?;
            let (width, height) = enigo
                .main_display()
                .map_err(|e| format!("display size unavailable: {e}"))?;
            let (px, py) = to_pixels(x, y, width, height);
            enigo
                .move_mouse(px, py, Coordinate::Abs)
                .map_err(|e| format!("mouse move failed: {e}"))?;
            Ok((px, py))
        })
        .await
        .map_err(|e| format!("input task panicked: {e}"))??;

        Ok(ToolOutput::Text(format!(
            "mouse moved successfully to position ({px}, {py})"
        )))
    }
}

/// 单次调用允许的最大点击数。点击在阻塞线程里注入，executor 的超时取消不了它，
/// 上限保证其总时长有界。
const MAX_CLICKS: u64 = 10;

/// 点击工具：click_mouse_buttons
pub struct ClickMouseTool {
    click_interval_ms: u64,
}

impl ClickMouseTool {
    pub fn new(click_interval_ms: u64) -> Self {
        Self { click_interval_ms }
    }
}

#[async_trait]
impl Tool for ClickMouseTool {
    fn name(&self) -> ToolName {
        ToolName::ClickMouseButtons
    }

    fn description(&self) -> &str {
        "Click a mouse button one or more times at the current pointer position."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "button": {
                    "type": "string",
                    "enum": ["left", "right", "middle"],
                    "description": "Which button to click"
                },
                "clicks": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_CLICKS,
                    "description": "Number of clicks (e.g. 2 for double-click)"
                }
            },
            "required": ["button", "clicks"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, String> {
        let button_name = args
            .get("button")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "missing required key 'button'".to_string())?
            .to_lowercase();
        let button = match button_name.as_str() {
            "left" => Button::Left,
            "right" => Button::Right,
            "middle" => Button::Middle,
            other => return Err(format!("invalid button name: {other}")),
        };
        let clicks = match args.get("clicks").and_then(|v| v.as_u64()) {
            Some(n) if n >= 1 => n,
            _ => return Err("clicks must be a positive integer".to_string()),
        };
        if clicks > MAX_CLICKS {
            return Err(format!("clicks must be at most {MAX_CLICKS}"));
        }

        let interval = std::time::Duration::from_millis(self.click_interval_ms);
        tokio::task::spawn_blocking(move || -> Result<(), String> {
            let mut enigo =
                Enigo::new(&Settings::default()).map_err(|e| format!("input backend: {e}"))?;
            for _ in 0..clicks {
                enigo
                    .button(button, Direction::Click)
                    .map_err(|e| format!("click failed: {e}"))?;
                std::thread::sleep(interval);
            }
            Ok(())
        })
        .await
        .map_err(|e| format!("input task panicked: {e}"))??;

        Ok(ToolOutput::Text(format!(
            "clicked {button_name} button {clicks} times"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(0.5), 0.5);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_to_pixels_clamps_out_of_range() {
        // x=1.5 越界：钳位到屏幕右缘而不是报错（会话不得因此崩溃）
        let (px, py) = to_pixels(1.5, 0.5, 1920, 1080);
        assert_eq!(px, 1919);
        assert_eq!(py, 540);
    }

    #[test]
    fn test_to_pixels_normal() {
        let (px, py) = to_pixels(0.98, 0.02, 1000, 500);
        assert_eq!(px, 980);
        assert_eq!(py, 10);
    }

    #[tokio::test]
    async fn test_click_rejects_bad_button() {
        let tool = ClickMouseTool::new(0);
        let err = tool
            .execute(serde_json::json!({"button": "side", "clicks": 1}))
            .await
            .unwrap_err();
        assert!(err.contains("invalid button"));
    }

    #[tokio::test]
    async fn test_click_rejects_zero_clicks() {
        let tool = ClickMouseTool::new(0);
        let err = tool
            .execute(serde_json::json!({"button": "left", "clicks": 0}))
            .await
            .unwrap_err();
        assert!(err.contains("positive"));
    }

    #[tokio::test]
    async fn test_click_rejects_missing_button() {
        let tool = ClickMouseTool::new(0);
        let err = tool
            .execute(serde_json::json!({"clicks": 1}))
            .await
            .unwrap_err();
        assert!(err.contains("button"));
    }

    #[tokio::test]
    async fn test_click_rejects_negative_clicks() {
        let tool = ClickMouseTool::new(0);
        let err = tool
            .execute(serde_json::json!({"button": "left", "clicks": -3}))
            .await
            .unwrap_err();
        assert!(err.contains("positive"));
    }

    #[tokio::test]
    async fn test_click_rejects_excessive_clicks() {
        let tool = ClickMouseTool::new(0);
        let err = tool
            .execute(serde_json::json!({"button": "left", "clicks": 1000000}))
            .await
            .unwrap_err();
        assert!(err.contains("at most"));
    }
}
