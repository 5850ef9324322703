// 系统托盘
//
// 托盘图标、气球通知。图标不依赖资源文件，启动时用 GDI
// 现画一个取景框加十字准星。

use windows::Win32::Foundation::{COLORREF, HWND, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleBitmap, CreateCompatibleDC, CreatePen, CreateSolidBrush, DeleteDC,
    DeleteObject, Ellipse, FillRect, GetDC, GetStockObject, HBITMAP, LineTo, MoveToEx, NULL_BRUSH,
    PS_DASH, PS_SOLID, Rectangle, ReleaseDC, SelectObject,
};
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_INFO, NIF_MESSAGE, NIF_TIP, NIIF_INFO, NIM_ADD, NIM_DELETE, NIM_MODIFY,
    NOTIFYICONDATAW, NOTIFYICONDATAW_0, Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{CreateIconIndirect, HICON, ICONINFO};

use crate::constants::WM_APP_TRAYICON;
use crate::error::SystemError;
use crate::platform::windows::SafeHwnd;
use crate::utils::to_wide_chars;

/// 系统托盘管理器
#[derive(Debug)]
pub struct TrayManager {
    hwnd: SafeHwnd,
    icon_id: u32,
    is_added: bool,
}

impl TrayManager {
    /// 创建新的托盘管理器
    pub fn new() -> Self {
        Self {
            hwnd: SafeHwnd::default(),
            icon_id: 1,
            is_added: false,
        }
    }

    /// 初始化托盘：生成图标并挂到通知区
    pub fn initialize(&mut self, hwnd: HWND, tooltip: &str) -> Result<(), SystemError> {
        self.hwnd.set(Some(hwnd));
        let icon = create_tray_icon()?;
        self.add_icon(tooltip, icon)
    }

    /// 添加托盘图标
    pub fn add_icon(&mut self, tooltip: &str, icon: HICON) -> Result<(), SystemError> {
        if self.is_added {
            return Ok(());
        }

        unsafe {
            let tooltip_wide = to_wide_chars(tooltip);
            let mut tooltip_array = [0u16; 128];
            let copy_len = (tooltip_wide.len() - 1).min(tooltip_array.len() - 1);
            tooltip_array[..copy_len].copy_from_slice(&tooltip_wide[..copy_len]);

            let hwnd = self.hwnd.get().unwrap_or(HWND(std::ptr::null_mut()));
            let nid = NOTIFYICONDATAW {
                cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                hWnd: hwnd,
                uID: self.icon_id,
                uFlags: NIF_ICON | NIF_MESSAGE | NIF_TIP,
                uCallbackMessage: WM_APP_TRAYICON,
                hIcon: icon,
                szTip: tooltip_array,
                ..Default::default()
            };

            let result = Shell_NotifyIconW(NIM_ADD, &nid);
            if result.as_bool() {
                self.is_added = true;
                Ok(())
            } else {
                Err(SystemError::TrayError(
                    "Failed to add tray icon".to_string(),
                ))
            }
        }
    }

    /// 显示气球通知
    pub fn show_balloon(&self, title: &str, text: &str) -> Result<(), SystemError> {
        if !self.is_added {
            return Err(SystemError::TrayError("Tray icon not added".to_string()));
        }

        unsafe {
            let title_wide = to_wide_chars(title);
            let text_wide = to_wide_chars(text);

            let mut title_array = [0u16; 64];
            let mut text_array = [0u16; 256];
            let title_len = (title_wide.len() - 1).min(title_array.len() - 1);
            let text_len = (text_wide.len() - 1).min(text_array.len() - 1);
            title_array[..title_len].copy_from_slice(&title_wide[..title_len]);
            text_array[..text_len].copy_from_slice(&text_wide[..text_len]);

            let hwnd = self.hwnd.get().unwrap_or(HWND(std::ptr::null_mut()));
            let nid = NOTIFYICONDATAW {
                cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                hWnd: hwnd,
                uID: self.icon_id,
                uFlags: NIF_INFO,
                szInfoTitle: title_array,
                szInfo: text_array,
                Anonymous: NOTIFYICONDATAW_0 { uTimeout: 3000 },
                dwInfoFlags: NIIF_INFO,
                ..Default::default()
            };

            let result = Shell_NotifyIconW(NIM_MODIFY, &nid);
            if result.as_bool() {
                Ok(())
            } else {
                Err(SystemError::TrayError(
                    "Failed to show balloon".to_string(),
                ))
            }
        }
    }

    /// 移除托盘图标
    pub fn remove_icon(&mut self) -> Result<(), SystemError> {
        if !self.is_added {
            return Ok(());
        }

        unsafe {
            let hwnd = self.hwnd.get().unwrap_or(HWND(std::ptr::null_mut()));
            let nid = NOTIFYICONDATAW {
                cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                hWnd: hwnd,
                uID: self.icon_id,
                ..Default::default()
            };

            let result = Shell_NotifyIconW(NIM_DELETE, &nid);
            if result.as_bool() {
                self.is_added = false;
                Ok(())
            } else {
                Err(SystemError::TrayError(
                    "Failed to remove tray icon".to_string(),
                ))
            }
        }
    }

    pub fn is_added(&self) -> bool {
        self.is_added
    }
}

impl Default for TrayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrayManager {
    fn drop(&mut self) {
        let _ = self.remove_icon();
    }
}

/// 程序生成托盘图标：虚线取景框 + 十字准星 + 中心红点
fn create_tray_icon() -> Result<HICON, SystemError> {
    unsafe {
        let hdc = GetDC(None);
        let mem_dc = CreateCompatibleDC(Some(hdc));
        let bitmap = CreateCompatibleBitmap(hdc, 32, 32);
        let old_bitmap = SelectObject(mem_dc, bitmap.into());

        // 白底
        let white = CreateSolidBrush(COLORREF(0x00FFFFFF));
        let full = RECT {
            left: 0,
            top: 0,
            right: 32,
            bottom: 32,
        };
        FillRect(mem_dc, &full, white);
        let _ = DeleteObject(white.into());

        let dark = COLORREF(0x00323232);

        // 虚线取景框
        let frame_pen = CreatePen(PS_DASH, 1, dark);
        let old_pen = SelectObject(mem_dc, frame_pen.into());
        let old_brush = SelectObject(mem_dc, GetStockObject(NULL_BRUSH));
        let _ = Rectangle(mem_dc, 4, 4, 28, 28);

        // 十字准星
        let cross_pen = CreatePen(PS_SOLID, 1, dark);
        SelectObject(mem_dc, cross_pen.into());
        let _ = MoveToEx(mem_dc, 16, 7, None);
        let _ = LineTo(mem_dc, 16, 25);
        let _ = MoveToEx(mem_dc, 7, 16, None);
        let _ = LineTo(mem_dc, 25, 16);

        // 中心红点 RGB(200, 50, 50)
        let red = CreateSolidBrush(COLORREF(0x003232C8));
        SelectObject(mem_dc, red.into());
        let _ = Ellipse(mem_dc, 13, 13, 19, 19);

        SelectObject(mem_dc, old_brush);
        SelectObject(mem_dc, old_pen);
        let _ = DeleteObject(frame_pen.into());
        let _ = DeleteObject(cross_pen.into());
        let _ = DeleteObject(red.into());
        SelectObject(mem_dc, old_bitmap);
        let _ = DeleteDC(mem_dc);
        ReleaseDC(None, hdc);

        let icon = create_icon_from_bitmap(bitmap);
        let _ = DeleteObject(bitmap.into());
        icon
    }
}

/// 从位图创建图标
fn create_icon_from_bitmap(bitmap: HBITMAP) -> Result<HICON, SystemError> {
    unsafe {
        // 全不透明掩码
        let hdc = GetDC(None);
        let mask_bitmap = CreateCompatibleBitmap(hdc, 32, 32);
        let mask_dc = CreateCompatibleDC(Some(hdc));
        let old_mask_bitmap = SelectObject(mask_dc, mask_bitmap.into());

        let opaque_brush = CreateSolidBrush(COLORREF(0x00000000));
        let mask_rect = RECT {
            left: 0,
            top: 0,
            right: 32,
            bottom: 32,
        };
        FillRect(mask_dc, &mask_rect, opaque_brush);

        SelectObject(mask_dc, old_mask_bitmap);
        let _ = DeleteDC(mask_dc);
        let _ = DeleteObject(opaque_brush.into());
        ReleaseDC(None, hdc);

        let icon_info = ICONINFO {
            fIcon: TRUE,
            xHotspot: 0,
            yHotspot: 0,
            hbmMask: mask_bitmap,
            hbmColor: bitmap,
        };

        let icon = CreateIconIndirect(&icon_info)
            .map_err(|e| SystemError::TrayError(format!("CreateIconIndirect failed: {e}")));

        let _ = DeleteObject(mask_bitmap.into());
        icon
    }
}
