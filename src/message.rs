// 全局消息系统
//
// 托盘菜单、托盘点击和热键线程统一汇聚为 Command，
// 由 App 层在 UI 线程上串行执行，避免模块间直接访问状态。

use crate::constants::{
    HOTKEY_ID_FULLSCREEN, HOTKEY_ID_REGION, HOTKEY_ID_WINDOW, MENU_ID_CAPTURE_FULLSCREEN,
    MENU_ID_CAPTURE_REGION, MENU_ID_CAPTURE_WINDOW, MENU_ID_CHOOSE_DIR, MENU_ID_FORMAT_JPG,
    MENU_ID_FORMAT_PNG, MENU_ID_QUIT,
};

/// 捕获类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// 区域截图（橡皮筋框选）
    Region,
    /// 全虚拟桌面截图
    Fullscreen,
    /// 前台窗口截图
    Window,
}

impl CaptureKind {
    /// 从全局热键 ID 解析
    pub fn from_hotkey_id(id: i32) -> Option<Self> {
        match id {
            HOTKEY_ID_REGION => Some(CaptureKind::Region),
            HOTKEY_ID_FULLSCREEN => Some(CaptureKind::Fullscreen),
            HOTKEY_ID_WINDOW => Some(CaptureKind::Window),
            _ => None,
        }
    }
}

/// App 层命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 执行一次捕获
    Capture(CaptureKind),
    /// 切换保存格式并持久化
    SetFormat(&'static str),
    /// 弹出保存目录选择器
    ChooseSaveDir,
    /// 退出应用
    Quit,
}

impl Command {
    /// 从托盘菜单命令 ID 解析
    pub fn from_menu_id(id: u32) -> Option<Self> {
        match id {
            MENU_ID_CAPTURE_REGION => Some(Command::Capture(CaptureKind::Region)),
            MENU_ID_CAPTURE_FULLSCREEN => Some(Command::Capture(CaptureKind::Fullscreen)),
            MENU_ID_CAPTURE_WINDOW => Some(Command::Capture(CaptureKind::Window)),
            MENU_ID_FORMAT_PNG => Some(Command::SetFormat("png")),
            MENU_ID_FORMAT_JPG => Some(Command::SetFormat("jpg")),
            MENU_ID_CHOOSE_DIR => Some(Command::ChooseSaveDir),
            MENU_ID_QUIT => Some(Command::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_kind_from_hotkey_id() {
        assert_eq!(
            CaptureKind::from_hotkey_id(HOTKEY_ID_REGION),
            Some(CaptureKind::Region)
        );
        assert_eq!(
            CaptureKind::from_hotkey_id(HOTKEY_ID_WINDOW),
            Some(CaptureKind::Window)
        );
        assert_eq!(CaptureKind::from_hotkey_id(99), None);
    }

    #[test]
    fn command_from_menu_id() {
        assert_eq!(
            Command::from_menu_id(MENU_ID_FORMAT_JPG),
            Some(Command::SetFormat("jpg"))
        );
        assert_eq!(Command::from_menu_id(MENU_ID_QUIT), Some(Command::Quit));
        assert_eq!(Command::from_menu_id(0), None);
    }
}
