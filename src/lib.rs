//! Plant Doctor
//!
//! 植物の健康診断・土壌分析・栽培のコツをAIで提供する。
//! 画面の状態機械（`session`）、非同期コントローラ（`app`）、
//! 履歴ストア（`history`）、Geminiゲートウェイ（`gateway`）からなる。

pub mod app;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod gateway;
pub mod history;
pub mod image_input;
pub mod interactive;
pub mod render;
pub mod session;
pub mod storage;
pub mod view;

pub use app::PlantDoctor;
pub use error::{PlantDoctorError, Result};
pub use view::{ScanMode, View, Workflow};
