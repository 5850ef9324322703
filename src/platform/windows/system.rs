// 系统信息与进程级设置

use windows::Win32::Foundation::RECT;
use windows::Win32::UI::HiDpi::{PROCESS_PER_MONITOR_DPI_AWARE, SetProcessDpiAwareness};
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowRect, SetProcessDPIAware,
};

use crate::types::Rect;

/// 启用 DPI 感知，保证多显示器坐标换算正确
///
/// 新 API 失败时回退到旧的 SetProcessDPIAware。
pub fn enable_dpi_awareness() {
    unsafe {
        if SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE).is_err() {
            let _ = SetProcessDPIAware();
        }
    }
}

/// 查询前台窗口的屏幕矩形
///
/// 没有前台窗口（或查询失败）时返回 None，调用方降级为全屏截图。
pub fn foreground_window_rect() -> Option<Rect> {
    unsafe {
        let hwnd = GetForegroundWindow();
        if hwnd.is_invalid() {
            return None;
        }
        let mut rect = RECT::default();
        GetWindowRect(hwnd, &mut rect).ok()?;
        Some(rect.into())
    }
}
