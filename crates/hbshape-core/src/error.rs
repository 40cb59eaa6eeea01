//! Error types for hbshape

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HbShapeError>;

/// Main error type for hbshape
#[derive(Debug, Error)]
pub enum HbShapeError {
    #[error("Font engine unavailable: {0}")]
    EngineInit(#[from] EngineInitError),

    #[error("Font loading failed: {message} ({code})")]
    FontLoad { code: i32, message: String },

    #[error("Setting char size failed: {message} ({code})")]
    CharSize { code: i32, message: String },

    #[error("Invalid font size: {0}")]
    InvalidSize(u32),

    #[error("Shaping font creation failed: {0}")]
    ShapingFontCreation(String),

    #[error("Shaping failed: {0}")]
    Shaping(#[from] ShapingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HbShapeError {
    /// Engine status code carried by this error, if any
    pub fn code(&self) -> Option<i32> {
        match self {
            HbShapeError::EngineInit(err) => Some(err.code),
            HbShapeError::FontLoad { code, .. } | HbShapeError::CharSize { code, .. } => {
                Some(*code)
            },
            _ => None,
        }
    }
}

/// The process-wide font engine could not be brought up.
///
/// Stored once when initialization fails and handed out again to every
/// caller that needs the engine afterwards, hence `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct EngineInitError {
    pub code: i32,
    pub message: String,
}

/// Shaping errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Text too long: {len} bytes (engine limit {max})")]
    TextTooLong { len: usize, max: usize },

    #[error("Backend error: {0}")]
    Backend(String),
}
