// UI 模块
//
// 区域选择状态机（纯逻辑）与遮罩窗口（Win32）。

pub mod selection;

#[cfg(windows)]
pub mod overlay;

pub use selection::{RubberBand, SelectionOutcome};
