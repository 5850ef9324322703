// 区域选择遮罩窗口
//
// 覆盖整个虚拟桌面（跨所有显示器的一个逻辑窗口）的无边框置顶窗口，
// 背景是弹出前冻结的桌面截图，所以遮罩自身永远不会被拍进结果里。
// 整体压暗显示，拖拽中的矩形内按原亮度透出并描边（"聚光" 效果），
// 指针旁实时显示选区尺寸。

use std::path::PathBuf;
use std::sync::{Arc, Once};

use tracing::warn;
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, CreatePen, DeleteDC,
    DeleteObject, EndPaint, GetStockObject, HBITMAP, HBRUSH, HDC, InvalidateRect, NULL_BRUSH,
    OPAQUE, PAINTSTRUCT, PS_SOLID, Rectangle, SRCCOPY, SelectObject, SetBkColor, SetBkMode,
    SetTextColor, TextOutW,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture, SetFocus, VK_ESCAPE};
use windows::Win32::UI::WindowsAndMessaging::{
    CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DestroyWindow, GWLP_USERDATA,
    GetWindowLongPtrW, IDC_CROSS, LoadCursorW, PostMessageW, RegisterClassW, SW_SHOW,
    SetForegroundWindow, SetWindowLongPtrW, ShowWindow, WM_DESTROY, WM_ERASEBKGND, WM_KEYDOWN,
    WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE, WM_PAINT, WNDCLASSW, WS_EX_TOOLWINDOW,
    WS_EX_TOPMOST, WS_POPUP,
};
use windows::core::PCWSTR;

use crate::constants::{
    DIM_KEEP, OVERLAY_WINDOW_CLASS, SELECTION_BORDER_COLORREF, SELECTION_BORDER_WIDTH,
    SIZE_LABEL_BG_COLORREF, SIZE_LABEL_OFFSET, SIZE_LABEL_TEXT_COLORREF, WM_APP_REGION_SAVED,
};
use crate::error::SystemError;
use crate::platform::windows::create_hbitmap_from_rgba;
use crate::screenshot::capture::desktop_source;
use crate::screenshot::save::save_screenshot;
use crate::settings::Settings;
use crate::system::HandoffSlot;
use crate::types::{Pixmap, PreCapture, Rect};
use crate::ui::selection::{RubberBand, SelectionOutcome};
use crate::utils::{extract_mouse_coords, to_wide_chars};

static REGISTER_CLASS: Once = Once::new();

/// 区域选择入口：冻结桌面、弹出遮罩
///
/// 桌面不可捕获时直接返回 None，不创建任何窗口。
/// 选区提交后在遮罩内部完成裁剪和保存，保存路径写入 `saved`
/// 单槽位并向 owner 投递 WM_APP_REGION_SAVED；取消则什么都不做。
/// 返回的实例由调用方持有，保证遮罩在事件处理期间不被提前销毁。
pub fn capture_region(
    settings: &Settings,
    pre_capture: Option<PreCapture>,
    owner: HWND,
    saved: Arc<HandoffSlot<PathBuf>>,
) -> Option<RegionSelector> {
    let (pixmap, virtual_rect) = desktop_source(pre_capture)?;
    match RegionSelector::show(pixmap, virtual_rect, settings.clone(), owner, saved) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("创建选择遮罩失败: {e}");
            None
        }
    }
}

/// 遮罩窗口句柄（窗口状态归窗口自己所有，随 WM_DESTROY 释放）
pub struct RegionSelector {
    hwnd: HWND,
}

impl RegionSelector {
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    fn show(
        background: Pixmap,
        virtual_rect: Rect,
        settings: Settings,
        owner: HWND,
        saved: Arc<HandoffSlot<PathBuf>>,
    ) -> Result<Self, SystemError> {
        unsafe {
            let instance = GetModuleHandleW(None).map_err(|e| {
                SystemError::WindowCreationError(format!("GetModuleHandleW failed: {e}"))
            })?;

            REGISTER_CLASS.call_once(|| {
                let class_name = to_wide_chars(OVERLAY_WINDOW_CLASS);
                let window_class = WNDCLASSW {
                    lpfnWndProc: Some(overlay_proc),
                    hInstance: instance.into(),
                    lpszClassName: PCWSTR(class_name.as_ptr()),
                    hbrBackground: HBRUSH(std::ptr::null_mut()),
                    hCursor: LoadCursorW(None, IDC_CROSS).unwrap_or_default(),
                    style: CS_HREDRAW | CS_VREDRAW,
                    ..Default::default()
                };
                if RegisterClassW(&window_class) == 0 {
                    warn!("遮罩窗口类注册失败");
                }
            });

            let width = background.width as i32;
            let height = background.height as i32;
            let bitmap = create_hbitmap_from_rgba(width, height, &background.data).ok_or_else(
                || SystemError::WindowCreationError("background bitmap creation failed".into()),
            )?;

            // 预先压暗一份背景，绘制时整幅铺底
            let mut dim_pixels = background.data.clone();
            for chunk in dim_pixels.chunks_exact_mut(4) {
                chunk[0] = (chunk[0] as u32 * DIM_KEEP / 255) as u8;
                chunk[1] = (chunk[1] as u32 * DIM_KEEP / 255) as u8;
                chunk[2] = (chunk[2] as u32 * DIM_KEEP / 255) as u8;
            }
            let Some(dimmed_bitmap) = create_hbitmap_from_rgba(width, height, &dim_pixels) else {
                let _ = DeleteObject(bitmap.into());
                return Err(SystemError::WindowCreationError(
                    "dimmed bitmap creation failed".into(),
                ));
            };

            let class_name = to_wide_chars(OVERLAY_WINDOW_CLASS);
            let hwnd = match CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_TOOLWINDOW,
                PCWSTR(class_name.as_ptr()),
                PCWSTR::null(),
                WS_POPUP,
                virtual_rect.left,
                virtual_rect.top,
                virtual_rect.width(),
                virtual_rect.height(),
                None,
                None,
                Some(instance.into()),
                None,
            ) {
                Ok(hwnd) => hwnd,
                Err(e) => {
                    let _ = DeleteObject(bitmap.into());
                    let _ = DeleteObject(dimmed_bitmap.into());
                    return Err(SystemError::WindowCreationError(format!(
                        "CreateWindowExW failed: {e}"
                    )));
                }
            };

            let state = Box::new(OverlayState {
                band: RubberBand::new(),
                background,
                settings,
                owner,
                saved,
                bitmap,
                dimmed_bitmap,
            });
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize);

            // 立刻抢到前台和键盘焦点，避免按键和点击漏给别的窗口
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = SetForegroundWindow(hwnd);
            let _ = SetFocus(Some(hwnd));

            Ok(Self { hwnd })
        }
    }
}

/// 窗口内部状态（Box 后挂在 GWLP_USERDATA 上，WM_DESTROY 时回收）
struct OverlayState {
    band: RubberBand,
    /// 冻结的桌面位图，提交时在它上面裁剪
    background: Pixmap,
    settings: Settings,
    owner: HWND,
    saved: Arc<HandoffSlot<PathBuf>>,
    bitmap: HBITMAP,
    dimmed_bitmap: HBITMAP,
}

impl OverlayState {
    /// 选区提交：裁剪冻结位图 → 保存 → 路径交接给 owner
    fn finish_commit(&self, rect: Rect) {
        let Some(cropped) = self.background.crop(rect) else {
            return;
        };
        if let Some(path) = save_screenshot(&cropped, &self.settings) {
            self.saved.store(path);
            unsafe {
                let _ = PostMessageW(
                    Some(self.owner),
                    WM_APP_REGION_SAVED,
                    WPARAM(0),
                    LPARAM(0),
                );
            }
        }
    }

    fn free_gdi(&self) {
        unsafe {
            let _ = DeleteObject(self.bitmap.into());
            let _ = DeleteObject(self.dimmed_bitmap.into());
        }
    }
}

unsafe extern "system" fn overlay_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        let state_ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut OverlayState;

        match msg {
            WM_PAINT => {
                if state_ptr.is_null() {
                    return DefWindowProcW(hwnd, msg, wparam, lparam);
                }
                paint(hwnd, &*state_ptr);
                LRESULT(0)
            }

            WM_ERASEBKGND => LRESULT(1),

            WM_LBUTTONDOWN => {
                if !state_ptr.is_null() {
                    let (x, y) = extract_mouse_coords(lparam);
                    let _ = SetCapture(hwnd);
                    (*state_ptr).band.press(x, y);
                    let _ = InvalidateRect(Some(hwnd), None, false);
                }
                LRESULT(0)
            }

            WM_MOUSEMOVE => {
                if !state_ptr.is_null() {
                    let (x, y) = extract_mouse_coords(lparam);
                    if (*state_ptr).band.drag(x, y) {
                        let _ = InvalidateRect(Some(hwnd), None, false);
                    }
                }
                LRESULT(0)
            }

            WM_LBUTTONUP => {
                if !state_ptr.is_null() {
                    let state = &mut *state_ptr;
                    if state.band.is_selecting() {
                        let _ = ReleaseCapture();
                        let (x, y) = extract_mouse_coords(lparam);
                        match state.band.release(x, y) {
                            SelectionOutcome::Committed(rect) => state.finish_commit(rect),
                            SelectionOutcome::Cancelled => {}
                        }
                        let _ = DestroyWindow(hwnd);
                    }
                }
                LRESULT(0)
            }

            WM_KEYDOWN => {
                if wparam.0 as u32 == VK_ESCAPE.0 as u32 {
                    if !state_ptr.is_null() {
                        (*state_ptr).band.cancel();
                    }
                    let _ = ReleaseCapture();
                    let _ = DestroyWindow(hwnd);
                }
                LRESULT(0)
            }

            WM_DESTROY => {
                if !state_ptr.is_null() {
                    SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
                    let state = Box::from_raw(state_ptr);
                    state.free_gdi();
                }
                // 主消息循环属于托盘窗口，这里不投递 WM_QUIT
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}

/// 双缓冲绘制：压暗背景 + 选区原图回贴 + 边框 + 尺寸标签
fn paint(hwnd: HWND, state: &OverlayState) {
    unsafe {
        let mut ps = PAINTSTRUCT::default();
        let hdc = BeginPaint(hwnd, &mut ps);
        let width = state.background.width as i32;
        let height = state.background.height as i32;

        let mem_dc = CreateCompatibleDC(Some(hdc));
        let buffer = CreateCompatibleBitmap(hdc, width, height);
        let old_buffer = SelectObject(mem_dc, buffer.into());
        let src_dc = CreateCompatibleDC(Some(hdc));
        let old_src = SelectObject(src_dc, state.dimmed_bitmap.into());

        let _ = BitBlt(mem_dc, 0, 0, width, height, Some(src_dc), 0, 0, SRCCOPY);

        if state.band.is_selecting() {
            let rect = state.band.current_rect();
            if !rect.is_empty() {
                // 选区内按原亮度透出
                SelectObject(src_dc, state.bitmap.into());
                let _ = BitBlt(
                    mem_dc,
                    rect.left,
                    rect.top,
                    rect.width(),
                    rect.height(),
                    Some(src_dc),
                    rect.left,
                    rect.top,
                    SRCCOPY,
                );

                let pen = CreatePen(
                    PS_SOLID,
                    SELECTION_BORDER_WIDTH,
                    COLORREF(SELECTION_BORDER_COLORREF),
                );
                let old_pen = SelectObject(mem_dc, pen.into());
                let old_brush = SelectObject(mem_dc, GetStockObject(NULL_BRUSH));
                let _ = Rectangle(mem_dc, rect.left, rect.top, rect.right, rect.bottom);
                SelectObject(mem_dc, old_brush);
                SelectObject(mem_dc, old_pen);
                let _ = DeleteObject(pen.into());

                draw_size_label(mem_dc, &state.band);
            }
        }

        let _ = BitBlt(hdc, 0, 0, width, height, Some(mem_dc), 0, 0, SRCCOPY);

        SelectObject(src_dc, old_src);
        let _ = DeleteDC(src_dc);
        SelectObject(mem_dc, old_buffer);
        let _ = DeleteObject(buffer.into());
        let _ = DeleteDC(mem_dc);
        let _ = EndPaint(hwnd, &ps);
    }
}

/// 指针旁的 "宽 x 高" 实时标签
fn draw_size_label(hdc: HDC, band: &RubberBand) {
    unsafe {
        let rect = band.current_rect();
        let text = format!(" {} x {} ", rect.width(), rect.height());
        let wide = to_wide_chars(&text);
        let (x, y) = band.current_pos();

        SetBkMode(hdc, OPAQUE);
        SetBkColor(hdc, COLORREF(SIZE_LABEL_BG_COLORREF));
        SetTextColor(hdc, COLORREF(SIZE_LABEL_TEXT_COLORREF));
        let _ = TextOutW(
            hdc,
            x + SIZE_LABEL_OFFSET,
            y + SIZE_LABEL_OFFSET,
            &wide[..wide.len() - 1], // 去掉结尾 NUL
        );
    }
}
