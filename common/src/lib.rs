//! Plant Doctor Common Library
//!
//! CLIとゲートウェイ実装で共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod language;
pub mod data_url;
pub mod translate;

pub use types::{
    AnalysisHistoryItem, AnalysisResult, CareTip, HealthStatus, PotentialIssue,
    RecommendedPlant, SoilAnalysisResult,
};
pub use error::{Error, Result};
pub use parser::{
    extract_json, parse_analysis_response, JsonShape, parse_care_tips_response, parse_soil_response,
};
pub use prompts::{build_translation_prompt, response_schema};
pub use language::{find_language, is_base_language, BASE_LANGUAGE, SUPPORTED_LANGUAGES};
pub use data_url::{
    build_data_url, extract_base64_from_data_url, extract_mime_type_from_data_url, is_data_url,
};
pub use translate::{ResultKind, Translatable};
