// 全局常量定义

/// 托盘主窗口类名
pub const APP_WINDOW_CLASS: &str = "ScreenshotTrayWindow";
/// 区域选择遮罩窗口类名
pub const OVERLAY_WINDOW_CLASS: &str = "ScreenshotOverlayWindow";
/// 托盘提示文本
pub const APP_NAME: &str = "截图工具";

/// 最小有效选择框尺寸（像素），宽或高小于等于该值视为取消
pub const MIN_SELECTION_SIZE: i32 = 5;

/// 文件名前缀
pub const FILENAME_PREFIX: &str = "Screenshot";
/// 时间戳部分长度上限（YYYYMMDD_HHMMSS_微秒，共 22 字符）
pub const TIMESTAMP_LEN: usize = 22;

// 全局热键 ID（RegisterHotKey）
pub const HOTKEY_ID_REGION: i32 = 1;
pub const HOTKEY_ID_FULLSCREEN: i32 = 2;
pub const HOTKEY_ID_WINDOW: i32 = 3;

// 热键虚拟键码：Ctrl+Alt+P / Ctrl+Alt+F / Ctrl+Alt+W
pub const VK_REGION: u32 = 'P' as u32;
pub const VK_FULLSCREEN: u32 = 'F' as u32;
pub const VK_WINDOW: u32 = 'W' as u32;

// 自定义窗口消息（WM_APP = 0x8000）
/// 托盘图标回调消息
pub const WM_APP_TRAYICON: u32 = 0x8000 + 1;
/// 热键线程发来的捕获请求，wparam 为热键 ID
pub const WM_APP_HOTKEY: u32 = 0x8000 + 2;
/// 区域选择完成且已保存，路径经单槽位交接
pub const WM_APP_REGION_SAVED: u32 = 0x8000 + 3;

// 托盘菜单命令 ID
pub const MENU_ID_CAPTURE_REGION: u32 = 1001;
pub const MENU_ID_CAPTURE_FULLSCREEN: u32 = 1002;
pub const MENU_ID_CAPTURE_WINDOW: u32 = 1003;
pub const MENU_ID_FORMAT_PNG: u32 = 1101;
pub const MENU_ID_FORMAT_JPG: u32 = 1102;
pub const MENU_ID_CHOOSE_DIR: u32 = 1201;
pub const MENU_ID_DIR_LABEL: u32 = 1202;
pub const MENU_ID_QUIT: u32 = 1301;

/// 遮罩暗化系数：背景像素亮度保留 155/255（约等于 40% 黑色遮罩）
pub const DIM_KEEP: u32 = 155;

/// 选择框边框颜色 RGB(0, 174, 255)，COLORREF 为 0x00BBGGRR 排列
pub const SELECTION_BORDER_COLORREF: u32 = 0x00FFAE00;
/// 尺寸标签背景色（深灰）
pub const SIZE_LABEL_BG_COLORREF: u32 = 0x00303030;
/// 尺寸标签文字颜色（白）
pub const SIZE_LABEL_TEXT_COLORREF: u32 = 0x00FFFFFF;
/// 选择框边框宽度
pub const SELECTION_BORDER_WIDTH: i32 = 2;
/// 尺寸标签相对指针的偏移
pub const SIZE_LABEL_OFFSET: i32 = 15;
