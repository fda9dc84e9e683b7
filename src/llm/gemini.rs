//! Gemini API 客户端（generateContent REST 接口）
//!
//! 通过 reqwest 调用 v1beta generateContent：system_instruction + contents（文本与
//! inline_data 图片 Part，图片按 base64 编码）+ generationConfig。取首个 candidate
//! 的全部 text Part 拼接作为回复。

use base64::Engine as _;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GenerationSection;
use crate::llm::LlmClient;
use crate::memory::{Part, Role, Turn};

/// Gemini API 常量
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const GEMINI_FLASH: &str = "gemini-2.5-flash";

/// Gemini 客户端：持有 HTTP Client、API Key、模型名与生成参数
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    generation: GenerationSection,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        generation: GenerationSection,
        request_timeout_secs: u64,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            generation,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: WireContent,
    contents: Vec<WireContent>,
    #[serde(rename = "generationConfig")]
    generation_config: WireGenerationConfig,
}

#[derive(Serialize)]
struct WireContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: WireBlob,
    },
}

#[derive(Serialize)]
struct WireBlob {
    #[serde(rename = "mimeType")]
    mime_type: String,
    /// base64 编码的图片字节
    data: String,
}

#[derive(Serialize)]
struct WireGenerationConfig {
    temperature: f64,
    #[serde(rename = "topP")]
    top_p: f64,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
    }
}

fn to_wire_part(part: &Part) -> WirePart {
    match part {
        Part::Text(text) => WirePart::Text { text: text.clone() },
        Part::InlineImage { mime_type, data } => WirePart::Inline {
            inline_data: WireBlob {
                mime_type: mime_type.clone(),
                data: base64::engine::general_purpose::STANDARD.encode(data),
            },
        },
    }
}

fn to_wire_contents(history: &[Turn], prompt: &str) -> Vec<WireContent> {
    let mut contents: Vec<WireContent> = history
        .iter()
        .map(|t| WireContent {
            role: Some(wire_role(t.role)),
            parts: t.parts.iter().map(to_wire_part).collect(),
        })
        .collect();
    // 本轮提示作为最后一条 user content，不回写历史
    contents.push(WireContent {
        role: Some("user"),
        parts: vec![WirePart::Text {
            text: prompt.to_string(),
        }],
    });
    contents
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(
        &self,
        system: &str,
        history: &[Turn],
        prompt: &str,
    ) -> Result<String, String> {
        let request = GenerateRequest {
            system_instruction: WireContent {
                role: None,
                parts: vec![WirePart::Text {
                    text: system.to_string(),
                }],
            },
            contents: to_wire_contents(history, prompt),
            generation_config: WireGenerationConfig {
                temperature: self.generation.temperature,
                top_p: self.generation.top_p,
                top_k: self.generation.top_k,
                max_output_tokens: self.generation.max_output_tokens,
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {}: {}", status, truncate(&body, 300)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid response body: {e}"))?;

        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err("empty candidate text".to_string());
        }
        Ok(text)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}
