//! Gemini API 連携
//!
//! `{base}/{model}:generateContent?key=...` に JSON を POST する。
//! 応答は responseSchema 付きの JSON モードで受け取り、
//! 共通ライブラリのパーサで検証する。

use super::{InferenceGateway, TranslationGateway};
use crate::config::Config;
use crate::error::{PlantDoctorError, Result};
use plant_doctor_common::prompts::{CARE_TIPS_PROMPT, PLANT_ANALYSIS_PROMPT, SOIL_ANALYSIS_PROMPT};
use plant_doctor_common::{
    build_translation_prompt, extract_base64_from_data_url, extract_mime_type_from_data_url,
    is_data_url, parse_analysis_response, parse_care_tips_response, parse_soil_response,
    response_schema, AnalysisResult, CareTip, ResultKind, SoilAnalysisResult, Translatable,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const ANALYSIS_TEMPERATURE: f32 = 0.2;
const CARE_TIPS_TEMPERATURE: f32 = 0.3;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================
// リクエスト/レスポンス型
// =============================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

impl GenerationConfig {
    fn json(kind: ResultKind, temperature: Option<f32>) -> Self {
        Self {
            temperature,
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(kind),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

// =============================================
// クライアント
// =============================================

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// APIキーが無くても作れる。呼び出し時に MissingApiKey で失敗する
    pub fn new(api_key: Option<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PlantDoctorError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.get_api_key().ok(),
            config.model.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// エンドポイントの差し替え（プロキシ・テスト用）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }

    /// generateContent を呼んで応答テキストを返す
    async fn generate(&self, request: &GeminiRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(PlantDoctorError::MissingApiKey)?;

        debug!(model = %self.model, "gemini request");
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let msg = if e.is_timeout() {
                    format!("request timed out after {}s", self.timeout.as_secs())
                } else {
                    format!("request failed: {e}")
                };
                error!("gemini {}", msg);
                PlantDoctorError::Transport(msg)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PlantDoctorError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            error!(status = status.as_u16(), "gemini api error");
            return Err(PlantDoctorError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        extract_text(&body)
    }
}

impl InferenceGateway for GeminiClient {
    async fn analyze_plant(&self, image: &str) -> Result<AnalysisResult> {
        let request = image_request(
            PLANT_ANALYSIS_PROMPT,
            image,
            GenerationConfig::json(ResultKind::PlantAnalysis, Some(ANALYSIS_TEMPERATURE)),
        )?;
        let text = self.generate(&request).await?;
        Ok(parse_analysis_response(&text)?)
    }

    async fn analyze_soil(&self, image: &str) -> Result<SoilAnalysisResult> {
        let request = image_request(
            SOIL_ANALYSIS_PROMPT,
            image,
            GenerationConfig::json(ResultKind::SoilAnalysis, Some(ANALYSIS_TEMPERATURE)),
        )?;
        let text = self.generate(&request).await?;
        Ok(parse_soil_response(&text)?)
    }

    async fn fetch_care_tips(&self) -> Result<Vec<CareTip>> {
        let request = text_request(
            CARE_TIPS_PROMPT.to_string(),
            GenerationConfig::json(ResultKind::CareTips, Some(CARE_TIPS_TEMPERATURE)),
        );
        let text = self.generate(&request).await?;
        Ok(parse_care_tips_response(&text)?)
    }
}

impl TranslationGateway for GeminiClient {
    async fn translate<T: Translatable>(&self, value: &T, language: &str) -> Result<T> {
        let original_json = serde_json::to_string_pretty(value)?;
        let prompt = build_translation_prompt(T::KIND, &original_json, language);
        let request = text_request(prompt, GenerationConfig::json(T::KIND, None));
        let text = self.generate(&request).await?;
        Ok(T::parse_response(&text)?)
    }
}

// =============================================
// 組み立て・解析（通信なし）
// =============================================

/// data URI を inline_data パートに変換
fn image_part(data_url: &str) -> Result<Part> {
    if !is_data_url(data_url) {
        return Err(PlantDoctorError::ImageLoad(
            "image must be a base64 data URI".to_string(),
        ));
    }
    let data = extract_base64_from_data_url(data_url)
        .filter(|data| !data.is_empty())
        .ok_or_else(|| PlantDoctorError::ImageLoad("data URI has no payload".to_string()))?;

    Ok(Part::InlineData {
        inline_data: InlineData {
            mime_type: extract_mime_type_from_data_url(data_url).to_string(),
            data: data.to_string(),
        },
    })
}

fn image_request(prompt: &str, image: &str, config: GenerationConfig) -> Result<GeminiRequest> {
    Ok(GeminiRequest {
        contents: vec![Content {
            parts: vec![
                image_part(image)?,
                Part::Text {
                    text: prompt.to_string(),
                },
            ],
        }],
        generation_config: config,
    })
}

fn text_request(prompt: String, config: GenerationConfig) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![Part::Text { text: prompt }],
        }],
        generation_config: config,
    }
}

/// 最初の候補のテキストを連結して返す
fn extract_text(body: &str) -> Result<String> {
    let response: GeminiResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(PlantDoctorError::EmptyResponse);
    }
    Ok(text)
}
