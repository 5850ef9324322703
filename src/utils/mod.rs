// 工具函数模块

#[cfg(windows)]
use std::{ffi::OsStr, iter::once, os::windows::ffi::OsStrExt};

// ==================== 字符串转换 ====================

/// 将字符串转换为Windows API所需的宽字符格式
#[cfg(windows)]
pub fn to_wide_chars(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(once(0)).collect()
}

// ==================== Windows消息处理 ====================

/// 从LPARAM中提取鼠标坐标
#[cfg(windows)]
#[inline]
pub fn extract_mouse_coords(lparam: windows::Win32::Foundation::LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
    (x, y)
}

/// 取 LPARAM 的低 16 位（等同于 LOWORD，托盘回调里是鼠标消息号）
#[cfg(windows)]
#[inline]
pub fn loword(lparam: windows::Win32::Foundation::LPARAM) -> u32 {
    (lparam.0 & 0xFFFF) as u32
}
