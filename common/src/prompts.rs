//! プロンプト生成モジュール
//!
//! ゲートウェイ実装で共有されるプロンプトとレスポンススキーマ:
//! - PLANT_ANALYSIS_PROMPT / SOIL_ANALYSIS_PROMPT / CARE_TIPS_PROMPT
//! - build_translation_prompt: 結果の種類ごとの翻訳指示
//! - response_schema: 構造化出力用のJSONスキーマ

use crate::translate::ResultKind;
use serde_json::{json, Value};

/// 植物診断プロンプト（画像と一緒に送る）
pub const PLANT_ANALYSIS_PROMPT: &str = r#"You are Plant Doctor AI, an expert botanist. Analyze this image of a plant.
Identify the plant species, assess its health, and identify any diseases, pests, or nutrient deficiencies.
Give clear, concise, and actionable advice for a non-expert home gardener.
If the plant looks healthy, identify it and provide standard care tips.
If no plant is visible, say so in the plantName field and leave the list fields empty.
Respond ONLY with the JSON object defined in the schema."#;

/// 土壌診断プロンプト（画像と一緒に送る）
pub const SOIL_ANALYSIS_PROMPT: &str = r#"You are a soil science expert. Analyze this image of soil.
Identify the soil type from its texture, color, and visible structure.
Describe the soil in plain language.
Recommend 3 to 5 plants or crops that would thrive in this soil, each with a short reason.
If no soil is visible, say so in the soilType field and leave the other fields empty.
Respond ONLY with the JSON object defined in the schema."#;

/// 栽培のコツ取得プロンプト（テキストのみ）
pub const CARE_TIPS_PROMPT: &str = r#"You are a friendly, encouraging expert botanist. Give 5 essential, general plant care tips for beginners.
Cover watering, sunlight, soil, pests, and humidity.
For each tip provide a creative title, detailed friendly advice that explains the 'why', and a one-sentence 'keyTakeaway' with the most important point.
Respond ONLY with the JSON array defined in the schema."#;

/// 翻訳プロンプト生成
///
/// # Arguments
/// * `kind` - 翻訳する結果の種類
/// * `original_json` - 元の結果のJSON
/// * `language` - 翻訳先の言語名（例: "Japanese"）
pub fn build_translation_prompt(kind: ResultKind, original_json: &str, language: &str) -> String {
    let fields = match kind {
        ResultKind::PlantAnalysis => {
            "Only translate the values of 'plantName', 'issue', 'description', 'remedy', and the items in 'careRecommendations'.\n\
             Do not translate the 'healthStatus' enum value and do not change 'confidence'."
        }
        ResultKind::SoilAnalysis => {
            "Only translate the values of 'soilType', 'description', 'plantName', and 'reasoning'."
        }
        ResultKind::CareTips => "Translate the values of 'title', 'content', and 'keyTakeaway'.",
    };

    format!(
        r#"Translate all user-facing string values in the following JSON {shape} to {language}.
Keep the exact original JSON structure, keys, item order, and data types (numbers and enums stay as they are).
{fields}
Original JSON:
{original_json}"#,
        shape = kind.json_shape(),
    )
}

/// 植物診断のレスポンススキーマ
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "plantName": {
                "type": "STRING",
                "description": "The common name of the plant identified in the image."
            },
            "healthStatus": {
                "type": "STRING",
                "enum": ["Healthy", "Unhealthy", "Needs Care"],
                "description": "A one-word assessment of the plant's overall health."
            },
            "confidence": {
                "type": "NUMBER",
                "description": "A confidence score from 0.0 to 1.0 for the health assessment."
            },
            "potentialIssues": {
                "type": "ARRAY",
                "description": "Potential diseases, pests, or other issues detected.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "issue": { "type": "STRING", "description": "The name of the issue." },
                        "description": { "type": "STRING", "description": "A short description of the issue and its symptoms." },
                        "remedy": { "type": "STRING", "description": "A concise, actionable remedy." }
                    },
                    "required": ["issue", "description", "remedy"]
                }
            },
            "careRecommendations": {
                "type": "ARRAY",
                "description": "General, actionable care tips for this plant.",
                "items": { "type": "STRING" }
            }
        },
        "required": ["plantName", "healthStatus", "confidence", "potentialIssues", "careRecommendations"]
    })
}

/// 土壌診断のレスポンススキーマ
pub fn soil_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "soilType": {
                "type": "STRING",
                "description": "The common name of the soil type (e.g. 'Sandy Loam', 'Clay')."
            },
            "description": {
                "type": "STRING",
                "description": "The soil's key characteristics such as texture, color, and structure."
            },
            "recommendedPlants": {
                "type": "ARRAY",
                "description": "Plants or crops well suited to this soil.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "plantName": { "type": "STRING", "description": "The common name of the plant." },
                        "reasoning": { "type": "STRING", "description": "Why this plant suits the soil." }
                    },
                    "required": ["plantName", "reasoning"]
                }
            }
        },
        "required": ["soilType", "description", "recommendedPlants"]
    })
}

/// 栽培のコツのレスポンススキーマ
pub fn care_tips_schema() -> Value {
    json!({
        "type": "ARRAY",
        "description": "General plant care tips.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "The category of the tip (e.g. 'Watering 101')." },
                "content": { "type": "STRING", "description": "Detailed, friendly advice explaining the 'why'." },
                "keyTakeaway": { "type": "STRING", "description": "One sentence with the most important point." }
            },
            "required": ["title", "content", "keyTakeaway"]
        }
    })
}

/// 結果の種類に対応するスキーマ
pub fn response_schema(kind: ResultKind) -> Value {
    match kind {
        ResultKind::PlantAnalysis => analysis_schema(),
        ResultKind::SoilAnalysis => soil_analysis_schema(),
        ResultKind::CareTips => care_tips_schema(),
    }
}
