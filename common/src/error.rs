//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Translation error: {0}")]
    Translation(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        let display = format!("{}", error);
        assert!(display.contains("JSON error"));
    }

    #[test]
    fn test_error_display_parse() {
        let error = Error::Parse("no JSON found in response".to_string());
        assert_eq!(format!("{}", error), "Parse error: no JSON found in response");
    }

    #[test]
    fn test_error_display_schema() {
        let error = Error::Schema("confidence 1.5 is outside [0, 1]".to_string());
        let display = format!("{}", error);
        assert!(display.starts_with("Schema error"));
        assert!(display.contains("1.5"));
    }

    #[test]
    fn test_error_display_translation() {
        let error = Error::Translation("healthStatus changed".to_string());
        assert_eq!(format!("{}", error), "Translation error: healthStatus changed");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Schema("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Schema"));
        assert!(debug.contains("テスト"));
    }
}
