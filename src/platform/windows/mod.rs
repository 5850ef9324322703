// Windows 平台实现

pub mod gdi;
pub mod handle;
pub mod system;

pub use gdi::{capture_virtual_desktop, copy_pixmap_to_clipboard, create_hbitmap_from_rgba};
pub use handle::SafeHwnd;
pub use system::{enable_dpi_awareness, foreground_window_rect};
