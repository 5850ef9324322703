// 托盘应用
//
// 一个隐藏主窗口承载消息循环。托盘点击、菜单命令和热键线程的
// 捕获请求都汇到它的 wndproc，统一派发到三个捕获入口；保存成功后
// 弹气球通知。所有 UI 状态只在本线程被触碰。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyMenu, DispatchMessageW,
    GWLP_USERDATA, GetCursorPos, GetMessageW, GetWindowLongPtrW, MF_CHECKED, MF_GRAYED, MF_POPUP,
    MF_SEPARATOR, MF_STRING, MSG, PostMessageW, PostQuitMessage, RegisterClassW,
    SetForegroundWindow, SetWindowLongPtrW, TPM_RETURNCMD, TPM_RIGHTBUTTON, TrackPopupMenu,
    TranslateMessage, WM_CLOSE, WM_DESTROY, WM_LBUTTONUP, WM_RBUTTONUP, WNDCLASSW,
    WS_EX_TOOLWINDOW, WS_POPUP,
};
use windows::core::{PCWSTR, w};

use crate::constants::{
    APP_NAME, APP_WINDOW_CLASS, MENU_ID_CAPTURE_FULLSCREEN, MENU_ID_CAPTURE_REGION,
    MENU_ID_CAPTURE_WINDOW, MENU_ID_CHOOSE_DIR, MENU_ID_DIR_LABEL, MENU_ID_FORMAT_JPG,
    MENU_ID_FORMAT_PNG, MENU_ID_QUIT, WM_APP_HOTKEY, WM_APP_REGION_SAVED, WM_APP_TRAYICON,
};
use crate::error::{AppResult, SystemError};
use crate::file_dialog::show_folder_picker;
use crate::message::{CaptureKind, Command};
use crate::screenshot::{capture_fullscreen, capture_window};
use crate::settings::Settings;
use crate::system::tray::TrayManager;
use crate::system::{HandoffSlot, HotkeyListener};
use crate::types::PreCapture;
use crate::ui::overlay::{RegionSelector, capture_region};
use crate::utils::{loword, to_wide_chars};

/// 启动托盘应用并阻塞在消息循环上，直到用户退出
pub fn run(settings: Settings) -> AppResult<()> {
    unsafe {
        let instance = GetModuleHandleW(None)?;
        let class_name = to_wide_chars(APP_WINDOW_CLASS);
        let window_class = WNDCLASSW {
            lpfnWndProc: Some(app_proc),
            hInstance: instance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            ..Default::default()
        };
        if RegisterClassW(&window_class) == 0 {
            return Err(
                SystemError::WindowCreationError("RegisterClassW failed".to_string()).into(),
            );
        }

        // 隐藏窗口只用来接收托盘回调和热键线程消息，从不显示
        let hwnd = CreateWindowExW(
            WS_EX_TOOLWINDOW,
            PCWSTR(class_name.as_ptr()),
            PCWSTR::null(),
            WS_POPUP,
            0,
            0,
            0,
            0,
            None,
            None,
            Some(instance.into()),
            None,
        )
        .map_err(|e| {
            SystemError::WindowCreationError(format!("CreateWindowExW failed: {e}"))
        })?;

        let app = App::new(hwnd, settings)?;
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(Box::new(app)) as isize);

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
    Ok(())
}

/// 托盘应用状态：设置、托盘、热键监听与在飞的遮罩
struct App {
    hwnd: HWND,
    settings: Settings,
    tray: TrayManager,
    hotkeys: HotkeyListener,
    pre_capture: Arc<HandoffSlot<PreCapture>>,
    /// 遮罩保存完成后经这里交接路径
    saved: Arc<HandoffSlot<PathBuf>>,
    /// 持有遮罩实例，防止其在事件处理期间被提前丢弃
    selector: Option<RegionSelector>,
}

impl App {
    fn new(hwnd: HWND, settings: Settings) -> AppResult<Self> {
        let mut tray = TrayManager::new();
        tray.initialize(
            hwnd,
            &format!("{APP_NAME} - Ctrl+Alt+P 区域截图，右键查看菜单"),
        )?;

        let mut hotkeys = HotkeyListener::new();
        let pre_capture = hotkeys.pre_capture();
        hotkeys.start(hwnd);

        let app = Self {
            hwnd,
            settings,
            tray,
            hotkeys,
            pre_capture,
            saved: Arc::new(HandoffSlot::new()),
            selector: None,
        };
        app.show_startup_balloon();
        Ok(app)
    }

    fn show_startup_balloon(&self) {
        let text = format!(
            "Ctrl+Alt+P 框选区域截图\n格式: {} | 保存到: {}",
            self.settings.format.to_uppercase(),
            self.settings.save_directory
        );
        let _ = self.tray.show_balloon(APP_NAME, &text);
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Capture(kind) => self.do_capture(kind),
            Command::SetFormat(format) => self.set_format(format),
            Command::ChooseSaveDir => self.choose_save_dir(),
            Command::Quit => self.quit(),
        }
    }

    fn do_capture(&mut self, kind: CaptureKind) {
        // 热键线程可能已经备好一帧预截图；菜单触发时槽位为空，走实时抓取
        let pre_capture = self.pre_capture.take();
        match kind {
            CaptureKind::Region => {
                self.selector = capture_region(
                    &self.settings,
                    pre_capture,
                    self.hwnd,
                    Arc::clone(&self.saved),
                );
            }
            CaptureKind::Fullscreen => {
                if let Some(path) = capture_fullscreen(&self.settings, pre_capture) {
                    self.notify(&path);
                }
            }
            CaptureKind::Window => {
                if let Some(path) = capture_window(&self.settings, pre_capture) {
                    self.notify(&path);
                }
            }
        }
    }

    fn notify(&self, path: &Path) {
        info!("截图已保存: {}", path.display());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let _ = self.tray.show_balloon("截图已保存", &name);
    }

    fn set_format(&mut self, format: &str) {
        self.settings.format = format.to_string();
        if let Err(e) = self.settings.save() {
            warn!("保存设置失败: {e}");
        }
    }

    fn choose_save_dir(&mut self) {
        if let Some(dir) = show_folder_picker(self.hwnd, "选择保存目录") {
            self.settings.save_directory = dir;
            if let Err(e) = self.settings.save() {
                warn!("保存设置失败: {e}");
            }
        }
    }

    /// 退出：持久化设置 → 停掉热键线程（等它结束）→ 摘掉托盘图标
    fn quit(&mut self) {
        if let Err(e) = self.settings.save() {
            warn!("保存设置失败: {e}");
        }
        self.hotkeys.stop();
        let _ = self.tray.remove_icon();
        unsafe {
            // 延迟到下一条消息再销毁窗口，避免在自己的借用期内释放 App
            let _ = PostMessageW(Some(self.hwnd), WM_CLOSE, WPARAM(0), LPARAM(0));
        }
    }

    /// 托盘右键菜单（每次弹出时按当前设置重建）
    fn show_context_menu(&mut self) {
        unsafe {
            let menu = CreatePopupMenu().unwrap_or_default();
            if menu.is_invalid() {
                return;
            }

            let _ = AppendMenuW(
                menu,
                MF_STRING,
                MENU_ID_CAPTURE_REGION as usize,
                w!("区域截图(&R)\tCtrl+Alt+P"),
            );
            let _ = AppendMenuW(
                menu,
                MF_STRING,
                MENU_ID_CAPTURE_FULLSCREEN as usize,
                w!("全屏截图(&F)\tCtrl+Alt+F"),
            );
            let _ = AppendMenuW(
                menu,
                MF_STRING,
                MENU_ID_CAPTURE_WINDOW as usize,
                w!("窗口截图(&W)\tCtrl+Alt+W"),
            );
            let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());

            // 格式子菜单，当前格式打勾
            let format_menu = CreatePopupMenu().unwrap_or_default();
            if !format_menu.is_invalid() {
                let png_flags = if self.settings.format == "png" {
                    MF_STRING | MF_CHECKED
                } else {
                    MF_STRING
                };
                let jpg_flags = if self.settings.format == "jpg" {
                    MF_STRING | MF_CHECKED
                } else {
                    MF_STRING
                };
                let _ = AppendMenuW(format_menu, png_flags, MENU_ID_FORMAT_PNG as usize, w!("PNG"));
                let _ = AppendMenuW(format_menu, jpg_flags, MENU_ID_FORMAT_JPG as usize, w!("JPG"));
                let _ = AppendMenuW(menu, MF_POPUP, format_menu.0 as usize, w!("格式"));
            }

            let _ = AppendMenuW(
                menu,
                MF_STRING,
                MENU_ID_CHOOSE_DIR as usize,
                w!("保存位置(&L)..."),
            );
            // 当前目录只展示，不可点击
            let dir_label = to_wide_chars(&format!("    {}", self.settings.save_directory));
            let _ = AppendMenuW(
                menu,
                MF_STRING | MF_GRAYED,
                MENU_ID_DIR_LABEL as usize,
                PCWSTR(dir_label.as_ptr()),
            );
            let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
            let _ = AppendMenuW(menu, MF_STRING, MENU_ID_QUIT as usize, w!("退出(&X)"));

            let mut cursor_pos = POINT::default();
            let _ = GetCursorPos(&mut cursor_pos);

            // 先把自己设为前台窗口，否则菜单不能正确消失
            let _ = SetForegroundWindow(self.hwnd);

            let cmd = TrackPopupMenu(
                menu,
                TPM_RIGHTBUTTON | TPM_RETURNCMD,
                cursor_pos.x,
                cursor_pos.y,
                Some(0),
                self.hwnd,
                None,
            );
            let _ = DestroyMenu(menu);

            if let Some(command) = Command::from_menu_id(cmd.0 as u32) {
                self.execute(command);
            }
        }
    }
}

unsafe extern "system" fn app_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        let app_ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut App;

        match msg {
            m if m == WM_APP_TRAYICON => {
                if !app_ptr.is_null() {
                    let app = &mut *app_ptr;
                    match loword(lparam) {
                        x if x == WM_LBUTTONUP => {
                            app.execute(Command::Capture(CaptureKind::Region));
                        }
                        x if x == WM_RBUTTONUP => app.show_context_menu(),
                        _ => {}
                    }
                }
                LRESULT(0)
            }

            m if m == WM_APP_HOTKEY => {
                if !app_ptr.is_null() {
                    if let Some(kind) = CaptureKind::from_hotkey_id(wparam.0 as i32) {
                        (*app_ptr).execute(Command::Capture(kind));
                    }
                }
                LRESULT(0)
            }

            m if m == WM_APP_REGION_SAVED => {
                if !app_ptr.is_null() {
                    let app = &mut *app_ptr;
                    app.selector = None;
                    if let Some(path) = app.saved.take() {
                        app.notify(&path);
                    }
                }
                LRESULT(0)
            }

            WM_DESTROY => {
                if !app_ptr.is_null() {
                    SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
                    drop(Box::from_raw(app_ptr));
                }
                PostQuitMessage(0);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}
