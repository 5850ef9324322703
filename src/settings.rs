// 应用程序设置
//
// 设置以 JSON 形式保存在可执行文件旁的 config.json 中。
// 读取失败（文件缺失、内容为空、JSON 损坏）时静默回退到默认值；
// 未知键通过 flatten 的副表原样保留，保证向前兼容。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

/// 应用程序设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// 截图保存目录（绝对路径）
    #[serde(default = "default_save_directory")]
    pub save_directory: String,

    /// 图片格式，"png" 或 "jpg"（不校验，直接用作扩展名）
    #[serde(default = "default_format")]
    pub format: String,

    /// JPEG 质量，约定 1-100
    #[serde(default = "default_jpg_quality")]
    pub jpg_quality: u32,

    /// 未识别的键原样保留（向前兼容）
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_save_directory() -> String {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .to_string_lossy()
        .into_owned()
}

fn default_format() -> String {
    "png".to_string()
}

fn default_jpg_quality() -> u32 {
    95
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            format: default_format(),
            jpg_quality: default_jpg_quality(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Settings {
    /// 获取设置文件路径（可执行文件旁的 config.json）
    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe().unwrap_or_default();
        path.set_file_name("config.json");
        path
    }

    /// 从默认路径加载设置
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// 从指定路径加载设置
    ///
    /// 文件缺失、内容为空或解析失败时返回默认值，不向用户报错。
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) if !content.trim().is_empty() => serde_json::from_str(&content)
                .unwrap_or_else(|e| {
                    debug!("设置文件解析失败，使用默认值: {e}");
                    Self::default()
                }),
            _ => Self::default(),
        }
    }

    /// 保存设置到默认路径
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// 保存设置到指定路径（多行缩进格式，覆盖写入）
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        (dir, path)
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let (_dir, path) = temp_config();
        let defaults = Settings::default();
        assert_eq!(Settings::load_from(&path), defaults);
        // 默认值对象本身不能被 load 修改
        assert_eq!(defaults, Settings::default());
    }

    #[test]
    fn load_empty_file_returns_defaults() {
        let (_dir, path) = temp_config();
        fs::write(&path, "").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        fs::write(&path, "   \n").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn load_corrupt_file_returns_defaults() {
        let (_dir, path) = temp_config();
        fs::write(&path, "{ not json ]").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let (_dir, path) = temp_config();
        let mut settings = Settings::default();
        settings.format = "jpg".to_string();
        settings.jpg_quality = 42;
        settings.save_directory = "C:\\Users\\测试用户\\截图".to_string();
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn roundtrip_preserves_long_unicode_paths() {
        let (_dir, path) = temp_config();
        let mut settings = Settings::default();
        settings.save_directory = format!("/tmp/スクリーンショット/{}", "я".repeat(200));
        assert!(settings.save_directory.chars().count() > 200);
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn partial_file_merges_defaults() {
        let (_dir, path) = temp_config();
        fs::write(&path, r#"{ "format": "jpg" }"#).unwrap();
        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.format, "jpg");
        assert_eq!(loaded.jpg_quality, Settings::default().jpg_quality);
        assert_eq!(loaded.save_directory, Settings::default().save_directory);
    }

    #[test]
    fn unknown_keys_roundtrip_unchanged() {
        let (_dir, path) = temp_config();
        fs::write(
            &path,
            r#"{ "format": "jpg", "future_feature": { "enabled": true }, "answer": 42 }"#,
        )
        .unwrap();
        let loaded = Settings::load_from(&path);
        assert_eq!(
            loaded.extra.get("future_feature"),
            Some(&serde_json::json!({ "enabled": true }))
        );
        assert_eq!(loaded.extra.get("answer"), Some(&serde_json::json!(42)));

        loaded.save_to(&path).unwrap();
        let reloaded = Settings::load_from(&path);
        assert_eq!(reloaded, loaded);
    }
}
