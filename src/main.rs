#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use sc_tray::platform;
use sc_tray::screenshot::capture_fullscreen;
use sc_tray::settings::Settings;

/// 图片格式命令行取值
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpg,
}

impl FormatArg {
    fn as_str(self) -> &'static str {
        match self {
            FormatArg::Png => "png",
            FormatArg::Jpg => "jpg",
        }
    }
}

/// 轻量截图工具：常驻托盘或一次性截屏
#[derive(Parser, Debug)]
#[command(name = "sc_tray", version, about = "轻量截图工具（托盘 + 全局热键）")]
struct Args {
    /// 截一次全屏后直接退出（不启动托盘）
    #[arg(long)]
    once: bool,

    /// 本次运行的图片格式覆盖（不写回配置）
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// 本次运行的保存目录覆盖（不写回配置）
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    platform::enable_dpi_awareness();

    let args = Args::parse();

    let mut settings = Settings::load();
    if let Some(format) = args.format {
        settings.format = format.as_str().to_string();
    }
    if let Some(save_dir) = args.save_dir {
        settings.save_directory = save_dir.to_string_lossy().into_owned();
    }

    if args.once {
        return match capture_fullscreen(&settings, None) {
            Some(path) => {
                println!("Saved: {}", path.display());
                ExitCode::SUCCESS
            }
            None => {
                tracing::error!("截屏失败");
                ExitCode::FAILURE
            }
        };
    }

    run_tray(settings)
}

#[cfg(windows)]
fn run_tray(settings: Settings) -> ExitCode {
    match sc_tray::app::run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("托盘应用启动失败: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(windows))]
fn run_tray(_settings: Settings) -> ExitCode {
    tracing::error!("托盘模式只支持 Windows，可用 --once 做一次性截屏");
    ExitCode::FAILURE
}
