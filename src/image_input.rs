//! CLI引数から画像の data URI を作る
//!
//! `data:` で始まる引数はそのまま使う。それ以外はファイルパスとして読み込み、
//! 拡張子からMIMEタイプを決めてBase64化する。

use crate::error::{PlantDoctorError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use plant_doctor_common::{build_data_url, is_data_url};
use std::path::Path;
use tracing::debug;

/// 対応拡張子とMIMEタイプ
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

pub fn load_image(arg: &str) -> Result<String> {
    if is_data_url(arg) {
        return Ok(arg.to_string());
    }

    let path = Path::new(arg);
    if !path.is_file() {
        return Err(PlantDoctorError::FileNotFound(arg.to_string()));
    }

    let mime_type = mime_type_for(path)?;
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(PlantDoctorError::ImageLoad(format!("{} is empty", path.display())));
    }

    debug!(path = %path.display(), bytes = bytes.len(), mime_type, "image loaded");
    Ok(build_data_url(mime_type, &STANDARD.encode(&bytes)))
}

fn mime_type_for(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    IMAGE_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| {
            PlantDoctorError::ImageLoad(format!(
                "unsupported image type: {} (use jpg, png, webp or gif)",
                path.display()
            ))
        })
}
