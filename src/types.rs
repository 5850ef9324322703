// 基础数据类型
//
// 捕获、裁剪、覆盖层共用的几何与像素类型，全部平台无关。

/// 平台无关的整数矩形（虚拟桌面坐标系）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// 创建新的矩形
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// 从原点和尺寸创建矩形
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// 规格化：保证宽高非负（任意两个对角点都可构成矩形）
    pub fn normalized(&self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    /// 平移
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// 与另一个矩形的交集（无交集时返回空矩形）
    pub fn intersected(&self, other: &Rect) -> Self {
        Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }
}

#[cfg(windows)]
impl From<windows::Win32::Foundation::RECT> for Rect {
    fn from(rect: windows::Win32::Foundation::RECT) -> Self {
        Rect {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        }
    }
}

#[cfg(windows)]
impl From<Rect> for windows::Win32::Foundation::RECT {
    fn from(rect: Rect) -> Self {
        windows::Win32::Foundation::RECT {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        }
    }
}

/// 捕获得到的位图：紧密排列的 RGBA8 像素缓冲
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Pixmap {
    /// 从像素缓冲创建，长度与尺寸不匹配时返回 None
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// 裁剪出矩形区域（自动规格化并收拢到位图边界内）
    ///
    /// 裁剪结果为空时返回 None，调用方按捕获失败处理。
    pub fn crop(&self, rect: Rect) -> Option<Pixmap> {
        let bounds = Rect::from_origin_size(0, 0, self.width as i32, self.height as i32);
        let rect = rect.normalized().intersected(&bounds);
        if rect.is_empty() {
            return None;
        }

        let width = rect.width() as usize;
        let height = rect.height() as usize;
        let src_stride = self.width as usize * 4;
        let mut data = Vec::with_capacity(width * height * 4);
        for row in 0..height {
            let y = rect.top as usize + row;
            let start = y * src_stride + rect.left as usize * 4;
            data.extend_from_slice(&self.data[start..start + width * 4]);
        }

        Some(Pixmap {
            width: width as u32,
            height: height as u32,
            data,
        })
    }
}

/// 热键线程在唤醒 UI 线程之前抓取的预截图数据包
///
/// 像素为 RGBA8，`origin_x`/`origin_y` 是抓取时虚拟桌面的原点，
/// 用于把窗口矩形换算到桌面本地坐标。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreCapture {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub origin_x: i32,
    pub origin_y: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed_pixmap(width: u32, height: u32) -> Pixmap {
        // 每个像素的 R 通道编码其线性下标，便于断言
        let mut data = Vec::new();
        for i in 0..(width * height) {
            data.extend_from_slice(&[i as u8, 0, 0, 255]);
        }
        Pixmap::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn rect_normalized_swaps_corners() {
        let rect = Rect::new(10, 20, 3, 5).normalized();
        assert_eq!(rect, Rect::new(3, 5, 10, 20));
        assert_eq!(rect.width(), 7);
        assert_eq!(rect.height(), 15);
    }

    #[test]
    fn rect_intersected_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 30, 30);
        assert!(a.intersected(&b).is_empty());
    }

    #[test]
    fn pixmap_from_rgba_rejects_bad_length() {
        assert!(Pixmap::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(Pixmap::from_rgba(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn crop_extracts_expected_pixels() {
        let pixmap = indexed_pixmap(4, 4);
        let cropped = pixmap.crop(Rect::new(1, 1, 3, 3)).unwrap();
        assert_eq!(cropped.width, 2);
        assert_eq!(cropped.height, 2);
        // (1,1) 的线性下标为 5，(2,2) 为 10
        assert_eq!(cropped.data[0], 5);
        assert_eq!(cropped.data[3 * 4], 10);
    }

    #[test]
    fn crop_clamps_to_bounds() {
        let pixmap = indexed_pixmap(4, 4);
        let cropped = pixmap.crop(Rect::new(-10, -10, 100, 100)).unwrap();
        assert_eq!((cropped.width, cropped.height), (4, 4));
        assert_eq!(cropped.data, pixmap.data);
    }

    #[test]
    fn crop_outside_bounds_is_none() {
        let pixmap = indexed_pixmap(4, 4);
        assert!(pixmap.crop(Rect::new(10, 10, 20, 20)).is_none());
        assert!(pixmap.crop(Rect::new(2, 2, 2, 2)).is_none());
    }
}
