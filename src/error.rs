use crate::view::{View, Workflow};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlantDoctorError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Gemini API key is not set. Run `plant-doctor config --set-api-key YOUR_KEY` or set GEMINI_API_KEY")]
    MissingApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API returned status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("API response contained no candidates")]
    EmptyResponse,

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] plant_doctor_common::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Cannot {trigger} from the {from} screen")]
    InvalidTransition { from: View, trigger: &'static str },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("A {0} request is already in progress")]
    Busy(Workflow),

    #[error("History item not found: {0}")]
    HistoryItemNotFound(String),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, PlantDoctorError>;
