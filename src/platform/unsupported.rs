// 非 Windows 平台的占位实现
//
// 所有能力函数返回 None / 空操作；调用方把它们当作
// "没有屏幕可捕获 / 没有前台窗口 / 剪贴板不可用" 处理。

use crate::error::CaptureError;
use crate::types::{Pixmap, PreCapture, Rect};

pub fn capture_virtual_desktop() -> Option<PreCapture> {
    None
}

pub fn foreground_window_rect() -> Option<Rect> {
    None
}

pub fn copy_pixmap_to_clipboard(_pixmap: &Pixmap) -> Result<(), CaptureError> {
    Ok(())
}

pub fn enable_dpi_awareness() {}
