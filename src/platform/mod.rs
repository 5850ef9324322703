// 平台能力层
//
// 截屏、前台窗口查询、剪贴板、DPI 这类依赖操作系统的能力在这里收口。
// Windows 上提供完整实现；其他平台在编译期选择占位实现，
// 返回 None / 空操作，调用方已有对应的降级路径。

#[cfg(windows)]
pub mod windows;

#[cfg(not(windows))]
mod unsupported;

#[cfg(windows)]
pub use self::windows::{
    capture_virtual_desktop, copy_pixmap_to_clipboard, enable_dpi_awareness,
    foreground_window_rect,
};

#[cfg(not(windows))]
pub use self::unsupported::{
    capture_virtual_desktop, copy_pixmap_to_clipboard, enable_dpi_awareness,
    foreground_window_rect,
};
