//! 診断結果の型定義
//!
//! CLIとゲートウェイで共有される型:
//! - AnalysisResult: 植物の健康診断結果
//! - SoilAnalysisResult: 土壌診断結果
//! - CareTip: 一般的な栽培のコツ
//! - AnalysisHistoryItem: 履歴に保存される診断記録
//!
//! JSONは camelCase。必須フィールドに `#[serde(default)]` は付けない
//! （欠けたレスポンスはデシリアライズ時点で失敗させる）。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 健康状態（翻訳対象外の閉じた列挙）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    #[serde(rename = "Needs Care")]
    NeedsCare,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 3] = [
        HealthStatus::Healthy,
        HealthStatus::Unhealthy,
        HealthStatus::NeedsCare,
    ];

    /// ワイヤ上のリテラル
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Unhealthy => "Unhealthy",
            HealthStatus::NeedsCare => "Needs Care",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 検出された問題
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialIssue {
    pub issue: String,
    pub description: String,
    pub remedy: String,
}

/// 植物の診断結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 植物名（植物が写っていない場合はその旨の文言）
    pub plant_name: String,
    pub health_status: HealthStatus,
    /// 0.0〜1.0
    pub confidence: f64,
    pub potential_issues: Vec<PotentialIssue>,
    pub care_recommendations: Vec<String>,
}

impl AnalysisResult {
    /// serdeで表現できない制約を検証
    pub fn validate(&self) -> Result<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(Error::Schema(format!(
                "confidence {} is outside [0, 1]",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// 土壌に合う植物
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedPlant {
    pub plant_name: String,
    pub reasoning: String,
}

/// 土壌診断結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilAnalysisResult {
    pub soil_type: String,
    pub description: String,
    pub recommended_plants: Vec<RecommendedPlant>,
}

/// 栽培のコツ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareTip {
    pub title: String,
    pub content: String,
    pub key_takeaway: String,
}

/// 履歴レコード（作成後は不変）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisHistoryItem {
    /// 作成時刻（エポックミリ秒）由来の一意なID
    pub id: String,
    /// data URI形式の画像
    pub image: String,
    /// ISO-8601
    pub date: String,
    pub analysis: AnalysisResult,
}
