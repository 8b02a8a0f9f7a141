//! PDF 渲染错误类型

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PdfError>;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("目录不存在: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Pdfium 库不可用: {0}")]
    Bind(String),

    #[error("加载 PDF 失败 {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    #[error("页面 {page_index} 不存在于 {}（共 {page_count} 页）", .path.display())]
    PageOutOfRange {
        path: PathBuf,
        page_index: u16,
        page_count: u16,
    },

    #[error("渲染页面 {page_index} 失败 {}: {reason}", .path.display())]
    Render {
        path: PathBuf,
        page_index: u16,
        reason: String,
    },

    #[error("不支持的图片格式: {0}")]
    UnsupportedFormat(String),

    #[error("保存图片失败 {}（此前已写入 {} 张）: {source}", .path.display(), .written.len())]
    Save {
        path: PathBuf,
        /// 失败前已成功写入的图片
        written: Vec<PathBuf>,
        #[source]
        source: image::ImageError,
    },

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    /// 单个文档的预期失败（文件损坏、页码越界、渲染失败），批处理中跳过即可
    pub fn is_document_failure(&self) -> bool {
        matches!(
            self,
            PdfError::Load { .. } | PdfError::PageOutOfRange { .. } | PdfError::Render { .. }
        )
    }
}
