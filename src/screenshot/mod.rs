// 截图管线模块
//
// 负责屏幕捕获、窗口裁剪与保存。

pub mod capture;
pub mod save;

pub use capture::{
    capture_fullscreen, capture_window, grab_virtual_desktop, pixmap_from_pre_capture,
};
pub use save::{generate_filename, save_screenshot};
