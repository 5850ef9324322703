// GDI 屏幕捕获与剪贴板
//
// 捕获流程：枚举所有显示器 → 求几何并集 → 逐显示器 BitBlt 拼接到
// 内存位图中的对应偏移 → GetDIBits 导出 BGRA → 翻转为 RGBA 数据包。

use std::ffi::c_void;

use windows::Win32::Foundation::{COLORREF, HANDLE, HWND, LPARAM, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC,
    CreateDIBSection, CreateSolidBrush, DIB_RGB_COLORS, DeleteDC, DeleteObject,
    EnumDisplayMonitors, FillRect, GetDC, GetDIBits, HBITMAP, HDC, HMONITOR, ReleaseDC, SRCCOPY,
    SelectObject,
};
use windows::Win32::System::DataExchange::{
    CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData,
};
use windows::Win32::System::Memory::{GMEM_MOVEABLE, GlobalAlloc, GlobalLock, GlobalUnlock};
use windows::core::BOOL;

use crate::error::CaptureError;
use crate::types::{Pixmap, PreCapture};

/// 32 位自顶向下 DIB 的位图信息头
fn bitmap_info_header(width: i32, height: i32) -> BITMAPINFOHEADER {
    BITMAPINFOHEADER {
        biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
        biWidth: width,
        biHeight: -height, // 负值表示自顶向下的位图
        biPlanes: 1,
        biBitCount: 32,
        biCompression: BI_RGB.0,
        biSizeImage: 0,
        biXPelsPerMeter: 0,
        biYPelsPerMeter: 0,
        biClrUsed: 0,
        biClrImportant: 0,
    }
}

unsafe extern "system" fn collect_monitors(
    _monitor: HMONITOR,
    _hdc: HDC,
    rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    unsafe {
        let monitors = &mut *(lparam.0 as *mut Vec<RECT>);
        if !rect.is_null() {
            monitors.push(*rect);
        }
    }
    TRUE
}

/// 捕获整个虚拟桌面（所有显示器几何并集）
///
/// 没有可枚举的显示器或任一 GDI 调用失败时返回 None。
pub fn capture_virtual_desktop() -> Option<PreCapture> {
    unsafe {
        let mut monitors: Vec<RECT> = Vec::new();
        let ok = EnumDisplayMonitors(
            None,
            None,
            Some(collect_monitors),
            LPARAM(&mut monitors as *mut Vec<RECT> as isize),
        );
        if !ok.as_bool() || monitors.is_empty() {
            return None;
        }

        let mut union = monitors[0];
        for m in &monitors[1..] {
            union.left = union.left.min(m.left);
            union.top = union.top.min(m.top);
            union.right = union.right.max(m.right);
            union.bottom = union.bottom.max(m.bottom);
        }
        let width = union.right - union.left;
        let height = union.bottom - union.top;
        if width <= 0 || height <= 0 {
            return None;
        }

        let screen_dc = GetDC(Some(HWND(std::ptr::null_mut())));
        if screen_dc.is_invalid() {
            return None;
        }
        let mem_dc = CreateCompatibleDC(Some(screen_dc));
        if mem_dc.is_invalid() {
            ReleaseDC(Some(HWND(std::ptr::null_mut())), screen_dc);
            return None;
        }
        let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
        if bitmap.is_invalid() {
            let _ = DeleteDC(mem_dc);
            ReleaseDC(Some(HWND(std::ptr::null_mut())), screen_dc);
            return None;
        }
        let old_bitmap = SelectObject(mem_dc, bitmap.into());

        // 显示器之间可能留有空隙，先铺白底
        let white = CreateSolidBrush(COLORREF(0x00FFFFFF));
        let full = RECT {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        };
        FillRect(mem_dc, &full, white);
        let _ = DeleteObject(white.into());

        // 把每个显示器的画面搬到它在并集中的偏移处
        let mut blit_ok = true;
        for m in &monitors {
            if BitBlt(
                mem_dc,
                m.left - union.left,
                m.top - union.top,
                m.right - m.left,
                m.bottom - m.top,
                Some(screen_dc),
                m.left,
                m.top,
                SRCCOPY,
            )
            .is_err()
            {
                blit_ok = false;
                break;
            }
        }

        let mut packet = None;
        if blit_ok {
            let mut bmi = BITMAPINFO {
                bmiHeader: bitmap_info_header(width, height),
                bmiColors: [Default::default(); 1],
            };
            let mut pixels = vec![0u8; (width * height * 4) as usize];
            let lines = GetDIBits(
                mem_dc,
                bitmap,
                0,
                height as u32,
                Some(pixels.as_mut_ptr() as *mut c_void),
                &mut bmi,
                DIB_RGB_COLORS,
            );
            if lines > 0 {
                // BGRA → RGBA
                for chunk in pixels.chunks_exact_mut(4) {
                    chunk.swap(0, 2);
                }
                packet = Some(PreCapture {
                    data: pixels,
                    width: width as u32,
                    height: height as u32,
                    origin_x: union.left,
                    origin_y: union.top,
                });
            }
        }

        SelectObject(mem_dc, old_bitmap);
        let _ = DeleteObject(bitmap.into());
        let _ = DeleteDC(mem_dc);
        ReleaseDC(Some(HWND(std::ptr::null_mut())), screen_dc);

        packet
    }
}

/// 从 RGBA 缓冲创建 GDI 位图（遮罩窗口的背景绘制用）
pub fn create_hbitmap_from_rgba(width: i32, height: i32, rgba: &[u8]) -> Option<HBITMAP> {
    if width <= 0 || height <= 0 || rgba.len() != (width as usize) * (height as usize) * 4 {
        return None;
    }
    unsafe {
        let screen_dc = GetDC(Some(HWND(std::ptr::null_mut())));
        if screen_dc.is_invalid() {
            return None;
        }

        let bmi = BITMAPINFO {
            bmiHeader: bitmap_info_header(width, height),
            bmiColors: [Default::default(); 1],
        };
        let mut pixels: *mut c_void = std::ptr::null_mut();
        let dib = CreateDIBSection(
            Some(screen_dc),
            &bmi,
            DIB_RGB_COLORS,
            &mut pixels,
            Some(HANDLE(std::ptr::null_mut())),
            0,
        );
        ReleaseDC(Some(HWND(std::ptr::null_mut())), screen_dc);

        let Ok(bitmap) = dib else {
            return None;
        };
        if pixels.is_null() {
            let _ = DeleteObject(bitmap.into());
            return None;
        }

        // RGBA → BGRA 填入 DIB 像素区
        let dst = pixels as *mut u8;
        for (i, chunk) in rgba.chunks_exact(4).enumerate() {
            let px = dst.add(i * 4);
            *px = chunk[2];
            *px.add(1) = chunk[1];
            *px.add(2) = chunk[0];
            *px.add(3) = chunk[3];
        }

        Some(bitmap)
    }
}

/// 把位图以 CF_DIB 格式放入系统剪贴板
pub fn copy_pixmap_to_clipboard(pixmap: &Pixmap) -> Result<(), CaptureError> {
    unsafe {
        // 打开剪贴板
        if OpenClipboard(Some(HWND(std::ptr::null_mut()))).is_err() {
            return Err(CaptureError::ClipboardError(
                "Failed to open clipboard".to_string(),
            ));
        }

        // 清空剪贴板
        if EmptyClipboard().is_err() {
            let _ = CloseClipboard();
            return Err(CaptureError::ClipboardError(
                "Failed to empty clipboard".to_string(),
            ));
        }

        // DIB 头 + BGRA 像素
        let header_size = std::mem::size_of::<BITMAPINFOHEADER>();
        let data_size = header_size + pixmap.data.len();
        let h_mem = match GlobalAlloc(GMEM_MOVEABLE, data_size) {
            Ok(mem) => mem,
            Err(_) => {
                let _ = CloseClipboard();
                return Err(CaptureError::ClipboardError(
                    "Failed to allocate global memory".to_string(),
                ));
            }
        };

        let mem_ptr = GlobalLock(h_mem);
        if mem_ptr.is_null() {
            let _ = CloseClipboard();
            return Err(CaptureError::ClipboardError(
                "Failed to lock global memory".to_string(),
            ));
        }

        let mut header = bitmap_info_header(pixmap.width as i32, pixmap.height as i32);
        header.biSizeImage = pixmap.data.len() as u32;
        std::ptr::copy_nonoverlapping(
            &header as *const BITMAPINFOHEADER as *const u8,
            mem_ptr as *mut u8,
            header_size,
        );

        // RGBA → BGRA
        let pixel_ptr = (mem_ptr as *mut u8).add(header_size);
        for (i, chunk) in pixmap.data.chunks_exact(4).enumerate() {
            let dst = pixel_ptr.add(i * 4);
            *dst = chunk[2];
            *dst.add(1) = chunk[1];
            *dst.add(2) = chunk[0];
            *dst.add(3) = chunk[3];
        }

        let _ = GlobalUnlock(h_mem);

        // 设置剪贴板数据（CF_DIB = 8）
        if SetClipboardData(8u32, Some(HANDLE(h_mem.0))).is_err() {
            let _ = CloseClipboard();
            return Err(CaptureError::ClipboardError(
                "Failed to set clipboard data".to_string(),
            ));
        }

        if CloseClipboard().is_err() {
            return Err(CaptureError::ClipboardError(
                "Failed to close clipboard".to_string(),
            ));
        }

        Ok(())
    }
}
