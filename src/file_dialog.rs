// 文件夹选择对话框

use windows::Win32::Foundation::HWND;
use windows::Win32::System::Com::{
    CLSCTX_INPROC_SERVER, COINIT_APARTMENTTHREADED, COINIT_DISABLE_OLE1DDE, CoCreateInstance,
    CoInitializeEx, CoUninitialize,
};
use windows::Win32::UI::Shell::{
    FOS_PATHMUSTEXIST, FOS_PICKFOLDERS, FileOpenDialog, IFileOpenDialog, SIGDN_FILESYSPATH,
};
use windows::core::PCWSTR;

use crate::utils::to_wide_chars;

/// 弹出保存目录选择对话框
///
/// 用户确认后返回所选目录；取消或对话框创建失败返回 None。
pub fn show_folder_picker(hwnd: HWND, title: &str) -> Option<String> {
    unsafe {
        // COM 初始化尽力而为：即使失败（比如线程套间已被设置）也继续
        // 尝试创建对话框，只有成功初始化时才调用 CoUninitialize
        let com_inited =
            CoInitializeEx(None, COINIT_APARTMENTTHREADED | COINIT_DISABLE_OLE1DDE).is_ok();

        let picked = (|| {
            let dialog: IFileOpenDialog =
                CoCreateInstance(&FileOpenDialog, None, CLSCTX_INPROC_SERVER).ok()?;

            let _ = dialog.SetOptions(FOS_PICKFOLDERS | FOS_PATHMUSTEXIST);
            let title_wide = to_wide_chars(title);
            let _ = dialog.SetTitle(PCWSTR(title_wide.as_ptr()));

            dialog.Show(Some(hwnd)).ok()?;
            let item = dialog.GetResult().ok()?;
            let path = item.GetDisplayName(SIGDN_FILESYSPATH).ok()?;
            path.to_string().ok()
        })();

        if com_inited {
            CoUninitialize();
        }

        picked
    }
}
