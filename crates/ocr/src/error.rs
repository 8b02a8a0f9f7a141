//! OCR 标注错误类型

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnotateError>;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("打开图片失败 {}: {source}", .path.display())]
    ImageOpen {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("保存图片失败 {}: {source}", .path.display())]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("字体加载失败 {}: {reason}", .path.display())]
    Font { path: PathBuf, reason: String },

    #[error("无效的图片路径: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR 结果解析失败: {0}")]
    Json(#[from] serde_json::Error),
}
