//! OCR 结果类型

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 边界框（图片像素坐标）
///
/// JSON 中写作 `[left, top, right, bottom]`，也接受四个角点 `[[x, y]; 4]`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BBoxRepr", into = "[f32; 4]")]
pub struct BBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BBoxRepr {
    Edges([f32; 4]),
    Points([[f32; 2]; 4]),
}

impl From<BBoxRepr> for BBox {
    fn from(repr: BBoxRepr) -> Self {
        match repr {
            BBoxRepr::Edges([left, top, right, bottom]) => BBox {
                left,
                top,
                right,
                bottom,
            },
            BBoxRepr::Points(points) => BBox::from_points(&points),
        }
    }
}

impl From<BBox> for [f32; 4] {
    fn from(bbox: BBox) -> Self {
        [bbox.left, bbox.top, bbox.right, bbox.bottom]
    }
}

impl BBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// 将四个角点转换为外接矩形
    pub fn from_points(points: &[[f32; 2]; 4]) -> Self {
        let min_x = points.iter().map(|p| p[0]).fold(f32::INFINITY, f32::min);
        let max_x = points.iter().map(|p| p[0]).fold(f32::NEG_INFINITY, f32::max);
        let min_y = points.iter().map(|p| p[1]).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p[1]).fold(f32::NEG_INFINITY, f32::max);

        Self::new(min_x, min_y, max_x, max_y)
    }

    pub fn width(&self) -> f32 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> f32 {
        (self.bottom - self.top).abs()
    }
}

/// 单行识别结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrTextLine {
    pub bbox: BBox,
    pub text: String,
    /// 置信度 0-1
    pub confidence: f32,
}

impl OcrTextLine {
    /// 标注文字：`<text> (<confidence>)`
    pub fn label(&self) -> String {
        format!("{} ({:.2})", self.text, self.confidence)
    }
}

/// 一张图片的 OCR 结果
pub type OcrResult = Vec<OcrTextLine>;

/// 从 JSON 文件读取 OCR 结果
pub fn load_ocr_result(path: &Path) -> Result<OcrResult> {
    let raw = fs::read_to_string(path)?;
    let result: OcrResult = serde_json::from_str(&raw)?;
    log::debug!("[Annotate] 读取 {} 行 OCR 结果: {}", result.len(), path.display());
    Ok(result)
}
