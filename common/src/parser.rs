//! APIレスポンスパーサー
//!
//! 推論APIのレスポンスからJSONを抽出し、
//! 診断結果・土壌診断結果・栽培のコツをパースして検証する

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, CareTip, SoilAnalysisResult};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// 期待するJSONのトップレベル形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Object => ('{', '}'),
            JsonShape::Array => ('[', ']'),
        }
    }
}

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 期待する形の生の {...} オブジェクト / [...] 配列
/// 3. エラー
///
/// # Examples
/// ```
/// use plant_doctor_common::{extract_json, JsonShape};
///
/// let response = "[note] Result: {\"soilType\": \"Clay\"}";
/// let json = extract_json(response, JsonShape::Object).unwrap();
/// assert_eq!(json, "{\"soilType\": \"Clay\"}");
/// ```
pub fn extract_json(response: &str, shape: JsonShape) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の {...} / [...] を探す
    let (open, close) = shape.delimiters();
    if let (Some(start), Some(end)) = (response.find(open), response.rfind(close)) {
        if end > start {
            return Ok(&response[start..=end]);
        }
    }

    Err(Error::Parse("no JSON found in response".into()))
}

/// 厳密なデシリアライズ
///
/// 構文エラーは Parse、フィールド欠落・型不一致は Schema として返す
fn parse_strict<T: DeserializeOwned>(response: &str, shape: JsonShape, what: &str) -> Result<T> {
    let json_str = extract_json(response, shape)?;
    serde_json::from_str(json_str).map_err(|e| match e.classify() {
        Category::Data => Error::Schema(format!("{what}: {e}")),
        _ => Error::Parse(format!("{what}: {e}")),
    })
}

/// 植物診断レスポンスをパース
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult> {
    let result: AnalysisResult = parse_strict(response, JsonShape::Object, "plant analysis")?;
    result.validate()?;
    Ok(result)
}

/// 土壌診断レスポンスをパース
pub fn parse_soil_response(response: &str) -> Result<SoilAnalysisResult> {
    parse_strict(response, JsonShape::Object, "soil analysis")
}

/// 栽培のコツ（配列）レスポンスをパース
pub fn parse_care_tips_response(response: &str) -> Result<Vec<CareTip>> {
    parse_strict(response, JsonShape::Array, "care tips")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HealthStatus;

    const PLANT_JSON: &str = r#"{
  "plantName": "Basil",
  "healthStatus": "Needs Care",
  "confidence": 0.74,
  "potentialIssues": [
    {"issue": "Aphids", "description": "Small green insects under leaves", "remedy": "Spray with insecticidal soap"}
  ],
  "careRecommendations": ["Pinch off flower buds", "Water at the base"]
}"#;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = format!("Here is the analysis:\n```json\n{}\n```\nThanks!", PLANT_JSON);
        let json = extract_json(&response, JsonShape::Object).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("Basil"));
    }

    #[test]
    fn test_extract_json_raw_object() {
        let response = r#"{"soilType": "Clay"}"#;
        assert_eq!(extract_json(response, JsonShape::Object).unwrap(), response);
    }

    #[test]
    fn test_extract_json_raw_array_with_surrounding_text() {
        let response = r#"Tips: [{"title": "a"}] enjoy."#;
        assert_eq!(extract_json(response, JsonShape::Array).unwrap(), r#"[{"title": "a"}]"#);
    }

    #[test]
    fn test_extract_json_object_containing_arrays() {
        let response = r#"{"list": [1, 2], "nested": {"k": "v"}}"#;
        assert_eq!(extract_json(response, JsonShape::Object).unwrap(), response);
    }

    #[test]
    fn test_extract_json_ignores_brackets_in_prose() {
        // 前置きの [..] に引きずられない
        let response = r#"[note] {"soilType": "Loam", "recommendedPlants": []}"#;
        assert_eq!(
            extract_json(response, JsonShape::Object).unwrap(),
            r#"{"soilType": "Loam", "recommendedPlants": []}"#
        );

        let response = r#"Tips {see below}: [{"title": "a"}]"#;
        assert_eq!(extract_json(response, JsonShape::Array).unwrap(), r#"[{"title": "a"}]"#);
    }

    #[test]
    fn test_parse_soil_response_after_bracketed_prose() {
        let response = r#"[note] {"soilType": "Loam", "description": "Crumbly", "recommendedPlants": []}"#;
        let soil = parse_soil_response(response).unwrap();
        assert_eq!(soil.soil_type, "Loam");
        assert!(soil.recommended_plants.is_empty());
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("No JSON here, just plain text.", JsonShape::Object);
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("no JSON found"));
        } else {
            panic!("Expected Parse error");
        }
        assert!(extract_json("", JsonShape::Array).is_err());
        // 配列を期待しているときはオブジェクトを拾わない
        assert!(extract_json(r#"{"title": "a"}"#, JsonShape::Array).is_err());
    }

    // =============================================
    // parse_analysis_response テスト
    // =============================================

    #[test]
    fn test_parse_analysis_response() {
        let result = parse_analysis_response(PLANT_JSON).unwrap();
        assert_eq!(result.plant_name, "Basil");
        assert_eq!(result.health_status, HealthStatus::NeedsCare);
        assert_eq!(result.potential_issues.len(), 1);
        assert_eq!(result.potential_issues[0].issue, "Aphids");
        assert_eq!(result.care_recommendations.len(), 2);
    }

    #[test]
    fn test_parse_analysis_response_missing_field_is_schema_error() {
        let response = r#"{"plantName": "Basil", "healthStatus": "Healthy", "confidence": 0.5}"#;
        assert!(matches!(parse_analysis_response(response), Err(Error::Schema(_))));
    }

    #[test]
    fn test_parse_analysis_response_bad_enum_is_schema_error() {
        let response = PLANT_JSON.replace("Needs Care", "Sick");
        assert!(matches!(parse_analysis_response(&response), Err(Error::Schema(_))));
    }

    #[test]
    fn test_parse_analysis_response_confidence_out_of_range() {
        let response = PLANT_JSON.replace("0.74", "74");
        let err = parse_analysis_response(&response).unwrap_err();
        assert!(matches!(err, Error::Schema(msg) if msg.contains("confidence")));
    }

    #[test]
    fn test_parse_analysis_response_truncated_is_parse_error() {
        let response = r#"{"plantName": "Basil", "healthStatus": "Healthy", "confidence": }"#;
        assert!(matches!(parse_analysis_response(response), Err(Error::Parse(_))));
    }

    // =============================================
    // 土壌・栽培のコツ
    // =============================================

    #[test]
    fn test_parse_soil_response() {
        let response = r#"```json
{"soilType": "Silt", "description": "Smooth and fertile", "recommendedPlants": [
  {"plantName": "Lettuce", "reasoning": "Holds moisture well"},
  {"plantName": "Willow", "reasoning": "Tolerates damp ground"}
]}
```"#;
        let soil = parse_soil_response(response).unwrap();
        assert_eq!(soil.soil_type, "Silt");
        assert_eq!(soil.recommended_plants.len(), 2);
    }

    #[test]
    fn test_parse_soil_response_missing_plants() {
        let response = r#"{"soilType": "Silt", "description": "Smooth"}"#;
        assert!(parse_soil_response(response).is_err());
    }

    #[test]
    fn test_parse_care_tips_response() {
        let response = r#"[
  {"title": "Watering 101", "content": "Water deeply.", "keyTakeaway": "Feel the soil first."},
  {"title": "Sunlight Secrets", "content": "Rotate pots.", "keyTakeaway": "Most houseplants like indirect light."}
]"#;
        let tips = parse_care_tips_response(response).unwrap();
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[1].key_takeaway, "Most houseplants like indirect light.");
    }

    #[test]
    fn test_parse_care_tips_response_object_is_error() {
        let response = r#"{"title": "Watering 101", "content": "Water deeply.", "keyTakeaway": "x"}"#;
        assert!(parse_care_tips_response(response).is_err());
    }
}
