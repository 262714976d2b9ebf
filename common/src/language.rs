//! 翻訳対応言語

/// 対応言語（表示名、アルファベット順）
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "Arabic",
    "Bengali",
    "Chinese (Simplified)",
    "Chinese (Traditional)",
    "Dutch",
    "English",
    "French",
    "German",
    "Hindi",
    "Indonesian",
    "Italian",
    "Japanese",
    "Korean",
    "Malay",
    "Marathi",
    "Polish",
    "Portuguese",
    "Punjabi",
    "Russian",
    "Spanish",
    "Tamil",
    "Telugu",
    "Thai",
    "Turkish",
    "Urdu",
    "Vietnamese",
];

/// 基本言語。選択されたら翻訳キャッシュを破棄する
pub const BASE_LANGUAGE: &str = "English";

pub fn is_base_language(language: &str) -> bool {
    language == BASE_LANGUAGE
}

/// 言語名を大文字小文字を無視して検索し、カタログ上の表記を返す
pub fn find_language(name: &str) -> Option<&'static str> {
    let name = name.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .copied()
        .find(|lang| lang.eq_ignore_ascii_case(name))
}

/// カタログ内の位置（セレクタの初期選択用）
pub fn language_index(name: &str) -> Option<usize> {
    SUPPORTED_LANGUAGES.iter().position(|lang| *lang == name)
}
