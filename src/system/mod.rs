// 系统集成模块
//
// 托盘图标、全局热键、跨线程单槽位交接。

pub mod handoff;
pub mod hotkeys;
#[cfg(windows)]
pub mod tray;

pub use handoff::HandoffSlot;
pub use hotkeys::HotkeyListener;
