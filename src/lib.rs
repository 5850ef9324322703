// 模块声明
pub mod constants;
pub mod error;
pub mod message;
pub mod platform;
pub mod screenshot;
pub mod settings;
pub mod system;
pub mod types;
pub mod ui;
pub mod utils;

#[cfg(windows)]
pub mod app;
#[cfg(windows)]
pub mod file_dialog;

// 重新导出主要类型
pub use error::{AppError, AppResult};
pub use message::{CaptureKind, Command};
pub use settings::Settings;
pub use types::{Pixmap, PreCapture, Rect};
