// Unified Error Handling Module
//
// Centralized error types for consistent error management across the application

use std::io;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("System error: {0}")]
    System(#[from] SystemError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Windows API error: {0}")]
    Windows(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Capture/save pipeline errors
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Screen capture failed: {0}")]
    CaptureError(String),

    #[error("Encode failed: {0}")]
    EncodeError(#[from] image::ImageError),

    #[error("Clipboard operation failed: {0}")]
    ClipboardError(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Settings persistence errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// System integration errors (tray, hotkeys, windows)
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Hotkey registration failed: {0}")]
    HotkeyError(String),

    #[error("System tray operation failed: {0}")]
    TrayError(String),

    #[error("Window creation failed: {0}")]
    WindowCreationError(String),
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convert Windows HRESULT to AppError
#[cfg(windows)]
impl From<windows::core::Error> for AppError {
    fn from(err: windows::core::Error) -> Self {
        AppError::Windows(format!("Windows API error: {err:?}"))
    }
}
