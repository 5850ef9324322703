// 保存与导出
//
// 时间戳命名 → 建目录 → 按设置编码 PNG/JPEG → 写文件 → 复制到剪贴板。
// 剪贴板失败只告警，不影响保存结果。

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::warn;

use crate::constants::{FILENAME_PREFIX, TIMESTAMP_LEN};
use crate::error::CaptureError;
use crate::platform;
use crate::settings::Settings;
use crate::types::Pixmap;

/// 生成时间戳文件名，如 Screenshot_20260805_143052_123456.png
///
/// 时间戳含微秒，进程内连续两次调用几乎不可能重名；
/// 文件名只含 ASCII 字母数字、下划线和一个扩展名点。
pub fn generate_filename(settings: &Settings) -> String {
    let now = chrono::Local::now();
    let mut stamp = format!(
        "{}_{:06}",
        now.format("%Y%m%d_%H%M%S"),
        now.timestamp_subsec_micros()
    );
    stamp.truncate(TIMESTAMP_LEN);
    format!("{FILENAME_PREFIX}_{stamp}.{}", settings.format)
}

/// 保存截图到配置目录并复制到剪贴板
///
/// 返回保存路径；位图为空或编码/写入失败时返回 None，
/// 不留下半成品文件，也不触发任何通知。
pub fn save_screenshot(pixmap: &Pixmap, settings: &Settings) -> Option<PathBuf> {
    if pixmap.is_empty() {
        return None;
    }

    let dir = Path::new(&settings.save_directory);
    if let Err(e) = fs::create_dir_all(dir) {
        warn!("创建保存目录 {} 失败: {e}", dir.display());
        return None;
    }

    let path = dir.join(generate_filename(settings));
    if let Err(e) = write_image(pixmap, &path, settings) {
        warn!("保存截图失败: {e}");
        return None;
    }

    if let Err(e) = platform::copy_pixmap_to_clipboard(pixmap) {
        warn!("复制到剪贴板失败: {e}");
    }

    Some(path)
}

/// 按设置格式编码写盘：png 走无损 PNG，其余一律按 JPEG 处理
fn write_image(pixmap: &Pixmap, path: &Path, settings: &Settings) -> Result<(), CaptureError> {
    let image = RgbaImage::from_raw(pixmap.width, pixmap.height, pixmap.data.clone()).ok_or_else(
        || CaptureError::CaptureError("pixel buffer does not match dimensions".to_string()),
    )?;

    if settings.format.eq_ignore_ascii_case("png") {
        image.save_with_format(path, ImageFormat::Png)?;
    } else {
        // JPEG 不支持透明通道，先转 RGB
        let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let quality = settings.jpg_quality.clamp(1, 100) as u8;
        JpegEncoder::new_with_quality(&mut writer, quality).encode_image(&rgb)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_has_prefix_extension_and_safe_charset() {
        let mut settings = Settings::default();
        settings.format = "png".to_string();
        let name = generate_filename(&settings);

        assert!(name.starts_with("Screenshot_"));
        assert!(name.ends_with(".png"));
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.'));
        assert!(!name.contains(' '));
        assert_eq!(name.matches('.').count(), 1);

        // 日期时间部分：YYYYMMDD_HHMMSS 至少 15 字符，另有微秒消歧
        let stamp = &name["Screenshot_".len()..name.len() - ".png".len()];
        assert_eq!(stamp.len(), TIMESTAMP_LEN);
        assert!(stamp.len() >= 15 + 6);
    }

    #[test]
    fn successive_filenames_do_not_collide() {
        let settings = Settings::default();
        let first = generate_filename(&settings);
        std::thread::sleep(std::time::Duration::from_micros(50));
        let second = generate_filename(&settings);
        assert_ne!(first, second);
    }

    #[test]
    fn save_empty_pixmap_is_none() {
        let settings = Settings::default();
        let empty = Pixmap {
            width: 0,
            height: 0,
            data: Vec::new(),
        };
        assert!(save_screenshot(&empty, &settings).is_none());
    }

    #[test]
    fn save_jpg_respects_format_and_quality() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            save_directory: dir.path().to_string_lossy().into_owned(),
            format: "jpg".to_string(),
            jpg_quality: 50,
            ..Settings::default()
        };
        let pixmap = Pixmap::from_rgba(2, 2, vec![255; 16]).unwrap();

        let path = save_screenshot(&pixmap, &settings).unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "jpg");
        assert_eq!(path.parent().unwrap(), dir.path());

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (2, 2));
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let settings = Settings {
            save_directory: nested.to_string_lossy().into_owned(),
            ..Settings::default()
        };
        let pixmap = Pixmap::from_rgba(2, 2, vec![0; 16]).unwrap();
        let path = save_screenshot(&pixmap, &settings).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}
