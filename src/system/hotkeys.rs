// 全局热键监听
//
// 在独立后台线程上注册 Ctrl+Alt+P/F/W 并维护自己的消息循环：
// 全局热键的接收不能被 UI 线程的绘制和菜单阻塞，反过来也一样。
// 收到热键后先做一次快速预截图存入单槽位，再向 UI 线程投递
// 捕获请求，以缩短按键到遮罩出现之间的可感知延迟。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(windows)]
use std::sync::atomic::AtomicU32;
#[cfg(windows)]
use std::thread::JoinHandle;

use crate::system::HandoffSlot;
use crate::types::PreCapture;

/// 全局热键监听器
pub struct HotkeyListener {
    /// 预截图单槽位：监听线程写入，UI 线程一次性取走
    pre_capture: Arc<HandoffSlot<PreCapture>>,
    running: Arc<AtomicBool>,
    /// 监听线程的 Win32 线程 ID，stop 时用于投递 WM_QUIT
    #[cfg(windows)]
    thread_id: Arc<AtomicU32>,
    #[cfg(windows)]
    handle: Option<JoinHandle<()>>,
}

impl HotkeyListener {
    /// 创建新的热键监听器（尚未启动线程）
    pub fn new() -> Self {
        Self {
            pre_capture: Arc::new(HandoffSlot::new()),
            running: Arc::new(AtomicBool::new(false)),
            #[cfg(windows)]
            thread_id: Arc::new(AtomicU32::new(0)),
            #[cfg(windows)]
            handle: None,
        }
    }

    /// 预截图槽位的共享引用
    pub fn pre_capture(&self) -> Arc<HandoffSlot<PreCapture>> {
        Arc::clone(&self.pre_capture)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 启动监听线程，热键事件以 WM_APP_HOTKEY 投递给 owner 窗口
    #[cfg(windows)]
    pub fn start(&mut self, owner: windows::Win32::Foundation::HWND) {
        if self.handle.is_some() {
            return;
        }
        self.running.store(true, Ordering::SeqCst);

        let owner = owner.0 as isize;
        let running = Arc::clone(&self.running);
        let thread_id = Arc::clone(&self.thread_id);
        let pre_capture = Arc::clone(&self.pre_capture);
        self.handle = Some(std::thread::spawn(move || {
            hotkey_loop(owner, running, thread_id, pre_capture);
        }));
    }

    /// 不支持全局热键的平台：不注册任何热键，立即返回
    #[cfg(not(windows))]
    pub fn start(&mut self) {
        self.running.store(true, Ordering::SeqCst);
    }

    /// 停止监听并等待线程退出
    ///
    /// 返回后热键注册已全部释放，进程可以安全退出。
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        #[cfg(windows)]
        {
            use windows::Win32::Foundation::{LPARAM, WPARAM};
            use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_QUIT};

            if self.handle.is_none() {
                return;
            }

            // 线程在建立消息队列后才写入 thread_id，这里等它就绪再投递
            let mut thread_id = self.thread_id.load(Ordering::SeqCst);
            let mut tries = 0;
            while thread_id == 0 && tries < 100 {
                std::thread::sleep(std::time::Duration::from_millis(10));
                thread_id = self.thread_id.load(Ordering::SeqCst);
                tries += 1;
            }
            if thread_id != 0 {
                unsafe {
                    let _ = PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
                }
            }
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

impl Default for HotkeyListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 监听线程主体：注册热键、阻塞在消息队列上、预截图并通知 UI 线程
#[cfg(windows)]
fn hotkey_loop(
    owner: isize,
    running: Arc<AtomicBool>,
    thread_id: Arc<AtomicU32>,
    pre_capture: Arc<HandoffSlot<PreCapture>>,
) {
    use tracing::warn;
    use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        MOD_ALT, MOD_CONTROL, RegisterHotKey, UnregisterHotKey,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        GetMessageW, MSG, PM_NOREMOVE, PeekMessageW, PostMessageW, WM_HOTKEY, WM_USER,
    };

    use crate::constants::{
        HOTKEY_ID_FULLSCREEN, HOTKEY_ID_REGION, HOTKEY_ID_WINDOW, VK_FULLSCREEN, VK_REGION,
        VK_WINDOW, WM_APP_HOTKEY,
    };
    use crate::message::CaptureKind;
    use crate::platform;

    unsafe {
        // 先强制创建本线程的消息队列，再公布线程 ID，
        // 保证 stop 投递的 WM_QUIT 不会丢失
        let mut msg = MSG::default();
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
        thread_id.store(GetCurrentThreadId(), Ordering::SeqCst);

        let combos = [
            (HOTKEY_ID_REGION, VK_REGION, "Ctrl+Alt+P"),
            (HOTKEY_ID_FULLSCREEN, VK_FULLSCREEN, "Ctrl+Alt+F"),
            (HOTKEY_ID_WINDOW, VK_WINDOW, "Ctrl+Alt+W"),
        ];
        for (id, vk, label) in combos {
            // 注册冲突（组合键被其他进程占用）只告警，剩余热键继续生效
            if RegisterHotKey(None, id, MOD_CONTROL | MOD_ALT, vk).is_err() {
                warn!("热键 {label} 注册失败（可能已被其他程序占用）");
            }
        }

        let owner = HWND(owner as *mut core::ffi::c_void);
        while running.load(Ordering::SeqCst) {
            let ret = GetMessageW(&mut msg, None, 0, 0);
            if ret.0 == 0 || ret.0 == -1 {
                break;
            }
            if msg.message == WM_HOTKEY {
                let id = msg.wParam.0 as i32;
                if CaptureKind::from_hotkey_id(id).is_some() {
                    // 趁 UI 线程还没醒，先抓一帧桌面备用；失败就让 UI 线程现抓
                    if let Some(packet) = platform::capture_virtual_desktop() {
                        pre_capture.store(packet);
                    }
                    let _ = PostMessageW(Some(owner), WM_APP_HOTKEY, WPARAM(id as usize), LPARAM(0));
                }
            }
        }

        for (id, _, _) in combos {
            let _ = UnregisterHotKey(None, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_returns_immediately() {
        let mut listener = HotkeyListener::new();
        listener.stop();
        assert!(!listener.is_running());
    }

    #[cfg(not(windows))]
    #[test]
    fn unsupported_platform_start_stop_is_noop() {
        let mut listener = HotkeyListener::new();
        listener.start();
        assert!(listener.is_running());
        listener.stop();
        assert!(!listener.is_running());
        assert!(listener.pre_capture().is_empty());
    }
}
