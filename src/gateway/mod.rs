//! 推論・翻訳ゲートウェイ
//!
//! 状態機械はこのトレイト越しに外部サービスを呼ぶ。
//! 成功時の値は必ずスキーマ検証済み。失敗は `PlantDoctorError` で返し、
//! 画面へのメッセージ変換は呼び出し側（settle）が行う。

pub mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use plant_doctor_common::{AnalysisResult, CareTip, SoilAnalysisResult, Translatable};

/// 画像診断と栽培のコツ
#[allow(async_fn_in_trait)]
pub trait InferenceGateway {
    /// 植物の健康診断（画像は data URI）
    async fn analyze_plant(&self, image: &str) -> Result<AnalysisResult>;

    /// 土壌の診断（画像は data URI）
    async fn analyze_soil(&self, image: &str) -> Result<SoilAnalysisResult>;

    /// 初心者向けの一般的な栽培のコツ
    async fn fetch_care_tips(&self) -> Result<Vec<CareTip>>;
}

/// 結果の翻訳
///
/// 構造・件数・数値・列挙値は変えず、読み物の文字列だけを置き換える。
/// 全部成功か全部失敗のどちらか。
#[allow(async_fn_in_trait)]
pub trait TranslationGateway {
    async fn translate<T: Translatable>(&self, value: &T, language: &str) -> Result<T>;
}
