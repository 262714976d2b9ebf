//! 翻訳対象の結果型
//!
//! 翻訳ゲートウェイは文字列だけを置き換えてよい。
//! `check_translation` で構造・件数・数値・列挙値が元と同一かを検査し、
//! 一つでも崩れていれば翻訳結果全体を破棄する。

use crate::error::{Error, Result};
use crate::parser::{parse_analysis_response, parse_care_tips_response, parse_soil_response};
use crate::types::{AnalysisResult, CareTip, SoilAnalysisResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// 結果の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    PlantAnalysis,
    SoilAnalysis,
    CareTips,
}

impl ResultKind {
    /// プロンプトで使うJSONの形
    pub fn json_shape(&self) -> &'static str {
        match self {
            ResultKind::PlantAnalysis | ResultKind::SoilAnalysis => "object",
            ResultKind::CareTips => "array",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::PlantAnalysis => f.write_str("plant analysis"),
            ResultKind::SoilAnalysis => f.write_str("soil analysis"),
            ResultKind::CareTips => f.write_str("care tips"),
        }
    }
}

/// 翻訳可能な結果
pub trait Translatable: Serialize + DeserializeOwned + Clone {
    const KIND: ResultKind;

    /// 翻訳レスポンスをパース・検証
    fn parse_response(response: &str) -> Result<Self>;

    /// 翻訳結果が元の構造を保っているか検査
    fn check_translation(&self, translated: &Self) -> Result<()>;
}

fn ensure_same_len(field: &str, original: usize, translated: usize) -> Result<()> {
    if original != translated {
        return Err(Error::Translation(format!(
            "{field}: expected {original} items, got {translated}"
        )));
    }
    Ok(())
}

impl Translatable for AnalysisResult {
    const KIND: ResultKind = ResultKind::PlantAnalysis;

    fn parse_response(response: &str) -> Result<Self> {
        parse_analysis_response(response)
    }

    fn check_translation(&self, translated: &Self) -> Result<()> {
        if self.health_status != translated.health_status {
            return Err(Error::Translation(format!(
                "healthStatus changed from {} to {}",
                self.health_status, translated.health_status
            )));
        }
        if self.confidence.to_bits() != translated.confidence.to_bits() {
            return Err(Error::Translation(format!(
                "confidence changed from {} to {}",
                self.confidence, translated.confidence
            )));
        }
        ensure_same_len(
            "potentialIssues",
            self.potential_issues.len(),
            translated.potential_issues.len(),
        )?;
        ensure_same_len(
            "careRecommendations",
            self.care_recommendations.len(),
            translated.care_recommendations.len(),
        )
    }
}

impl Translatable for SoilAnalysisResult {
    const KIND: ResultKind = ResultKind::SoilAnalysis;

    fn parse_response(response: &str) -> Result<Self> {
        parse_soil_response(response)
    }

    fn check_translation(&self, translated: &Self) -> Result<()> {
        ensure_same_len(
            "recommendedPlants",
            self.recommended_plants.len(),
            translated.recommended_plants.len(),
        )
    }
}

impl Translatable for Vec<CareTip> {
    const KIND: ResultKind = ResultKind::CareTips;

    fn parse_response(response: &str) -> Result<Self> {
        parse_care_tips_response(response)
    }

    fn check_translation(&self, translated: &Self) -> Result<()> {
        ensure_same_len("tips", self.len(), translated.len())
    }
}
