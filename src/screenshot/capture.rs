// 屏幕捕获
//
// 全屏与窗口捕获的统一入口。实际像素由平台能力层提供；
// 这里负责预截图复用、坐标换算与裁剪。捕获失败一律表现为
// None，调用方跳过保存与通知即可，不算致命错误。

use std::path::PathBuf;

use crate::platform;
use crate::screenshot::save::save_screenshot;
use crate::settings::Settings;
use crate::types::{Pixmap, PreCapture, Rect};

/// 把预截图数据包转换为位图和它对应的虚拟桌面矩形
///
/// 与实时抓取走同一种位图表示，下游裁剪逻辑不区分来源。
pub fn pixmap_from_pre_capture(packet: PreCapture) -> (Pixmap, Rect) {
    let rect = Rect::from_origin_size(
        packet.origin_x,
        packet.origin_y,
        packet.width as i32,
        packet.height as i32,
    );
    let pixmap = Pixmap {
        width: packet.width,
        height: packet.height,
        data: packet.data,
    };
    (pixmap, rect)
}

/// 实时抓取整个虚拟桌面
pub fn grab_virtual_desktop() -> Option<(Pixmap, Rect)> {
    platform::capture_virtual_desktop().map(pixmap_from_pre_capture)
}

/// 优先使用预截图，否则实时抓取
pub(crate) fn desktop_source(pre_capture: Option<PreCapture>) -> Option<(Pixmap, Rect)> {
    match pre_capture {
        Some(packet) => Some(pixmap_from_pre_capture(packet)),
        None => grab_virtual_desktop(),
    }
}

/// 捕获全虚拟桌面并保存
///
/// 返回保存路径；桌面不可捕获时返回 None。
pub fn capture_fullscreen(
    settings: &Settings,
    pre_capture: Option<PreCapture>,
) -> Option<PathBuf> {
    let (pixmap, _) = desktop_source(pre_capture)?;
    save_screenshot(&pixmap, settings)
}

/// 捕获前台窗口并保存
///
/// 查询不到前台窗口时降级为全屏捕获（预截图原样转交）。
pub fn capture_window(settings: &Settings, pre_capture: Option<PreCapture>) -> Option<PathBuf> {
    capture_window_inner(settings, pre_capture, platform::foreground_window_rect())
}

fn capture_window_inner(
    settings: &Settings,
    pre_capture: Option<PreCapture>,
    window_rect: Option<Rect>,
) -> Option<PathBuf> {
    let Some(window_rect) = window_rect else {
        return capture_fullscreen(settings, pre_capture);
    };

    let (pixmap, desktop_rect) = desktop_source(pre_capture)?;
    // 窗口矩形是屏幕坐标，减去并集原点换算到位图坐标
    let local = window_rect.translated(-desktop_rect.left, -desktop_rect.top);
    let cropped = pixmap.crop(local)?;
    save_screenshot(&cropped, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_packet(width: u32, height: u32) -> PreCapture {
        PreCapture {
            data: vec![200; (width * height * 4) as usize],
            width,
            height,
            origin_x: -100,
            origin_y: 50,
        }
    }

    fn test_settings(dir: &std::path::Path) -> Settings {
        Settings {
            save_directory: dir.to_string_lossy().into_owned(),
            format: "png".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn pre_capture_conversion_keeps_geometry_and_bytes() {
        let packet = test_packet(4, 2);
        let bytes = packet.data.clone();
        let (pixmap, rect) = pixmap_from_pre_capture(packet);
        assert_eq!((pixmap.width, pixmap.height), (4, 2));
        assert_eq!(pixmap.data, bytes);
        assert_eq!(rect, Rect::new(-100, 50, -96, 52));
    }

    #[test]
    fn window_capture_without_foreground_falls_back_to_fullscreen() {
        // 没有前台窗口矩形时必须走全屏路径，且预截图原样转交：
        // 这里平台抓取不可用，只有数据包能产出文件
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let path = capture_window_inner(&settings, Some(test_packet(4, 2)), None).unwrap();
        assert!(path.exists());

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (4, 2));
    }

    #[test]
    fn window_capture_crops_to_window_rect() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        // 窗口占据虚拟桌面 (-100,50) 起的 2×2 区域
        let window_rect = Rect::from_origin_size(-99, 50, 2, 2);
        let path =
            capture_window_inner(&settings, Some(test_packet(4, 2)), Some(window_rect)).unwrap();
        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (2, 2));
    }

    #[test]
    fn window_capture_with_empty_crop_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        // 窗口矩形完全落在桌面位图之外
        let window_rect = Rect::from_origin_size(10_000, 10_000, 100, 100);
        assert!(capture_window_inner(&settings, Some(test_packet(4, 2)), Some(window_rect)).is_none());
    }
}
