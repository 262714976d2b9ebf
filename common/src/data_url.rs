//! Data URLユーティリティ
//!
//! 画像は "data:image/jpeg;base64,/9j/4AAQ..." 形式の文字列で受け渡す

/// Data URLかどうか（base64形式のみ）
pub fn is_data_url(value: &str) -> bool {
    value.starts_with("data:")
        && value
            .split_once(',')
            .is_some_and(|(header, _)| header.ends_with(";base64"))
}

/// Data URLからBase64データ部分を抽出
///
/// # Returns
/// Base64エンコードされたデータ部分、または抽出失敗時はNone
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出
///
/// # Returns
/// MIMEタイプ（例: "image/jpeg"）、抽出失敗時は"image/jpeg"をデフォルトとして返す
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .split(':')
        .nth(1)
        .and_then(|s| s.split(';').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("image/jpeg")
}

/// MIMEタイプとBase64データからData URLを組み立てる
pub fn build_data_url(mime_type: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_data)
}
