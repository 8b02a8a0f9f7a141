//! 批量渲染目录中 PDF 的指定页面

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use docset_core::natsort_paths;

use crate::error::{PdfError, Result};
use crate::render::{PageRenderer, PdfiumRenderer};

/// 渲染配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterizeOptions {
    /// 要渲染的页码（从 0 开始）
    pub page_index: u16,
    /// DPI（每英寸点数），默认 300
    pub dpi: u32,
    /// 输出图片格式（扩展名），默认 jpg
    pub image_format: String,
}

impl Default for RasterizeOptions {
    fn default() -> Self {
        Self {
            page_index: 0,
            dpi: 300,
            image_format: "jpg".to_string(),
        }
    }
}

/// 被跳过的文档
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// 批处理结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct RasterizeSummary {
    /// 成功写入的图片路径（按处理顺序）
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedDocument>,
}

/// 列出目录下（不递归）以 `.pdf` 结尾的文件，自然排序
pub fn list_pdfs(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(PdfError::NotFound(directory.to_path_buf()));
    }

    let mut pdfs = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        let is_pdf = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(".pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }

    natsort_paths(&mut pdfs);
    Ok(pdfs)
}

/// 输出路径：`<directory>/<pdf 文件名>_page_<页码>.<格式>`
pub fn page_image_path(directory: &Path, pdf_path: &Path, page_index: u16, format: &str) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    directory.join(format!("{}_page_{}.{}", stem, page_index, format))
}

fn parse_format(format: &str) -> Result<ImageFormat> {
    ImageFormat::from_extension(format)
        .ok_or_else(|| PdfError::UnsupportedFormat(format.to_string()))
}

/// 渲染目录中每个 PDF 的指定页面并保存到同一目录
///
/// 文档无法打开、页码越界或渲染失败时记录警告并跳过该文档；
/// 目录不可读、图片写入失败等其他错误直接返回。
pub fn rasterize_directory<R: PageRenderer + ?Sized>(
    renderer: &R,
    directory: &Path,
    options: &RasterizeOptions,
) -> Result<RasterizeSummary> {
    let format = parse_format(&options.image_format)?;
    let pdfs = list_pdfs(directory)?;

    log::info!(
        "[Rasterize] {} 个 PDF，页码 {}，DPI {}",
        pdfs.len(),
        options.page_index,
        options.dpi
    );

    let mut summary = RasterizeSummary::default();

    for pdf_path in pdfs {
        let image = match renderer.render_page(&pdf_path, options.page_index, options.dpi) {
            Ok(image) => image,
            Err(err) if err.is_document_failure() => {
                log::warn!("[Rasterize] 跳过 {}: {}", pdf_path.display(), err);
                summary.skipped.push(SkippedDocument {
                    path: pdf_path,
                    reason: err.to_string(),
                });
                continue;
            }
            Err(err) => return Err(err),
        };

        let image_path =
            page_image_path(directory, &pdf_path, options.page_index, &options.image_format);

        // JPEG 不支持 alpha 通道
        if let Err(source) = image.to_rgb8().save_with_format(&image_path, format) {
            log::error!(
                "[Rasterize] 写入 {} 失败，已写入 {} 张后中止",
                image_path.display(),
                summary.written.len()
            );
            return Err(PdfError::Save {
                path: image_path,
                written: summary.written,
                source,
            });
        }

        log::info!("[Rasterize] 已保存 {}", image_path.display());
        summary.written.push(image_path);
    }

    Ok(summary)
}

/// 使用 pdfium 渲染目录中每个 PDF 的指定页面，返回成功写入的图片路径
pub fn save_pdf_page_as_image(
    directory: &Path,
    page_index: u16,
    dpi: u32,
    image_format: &str,
) -> Result<Vec<PathBuf>> {
    let options = RasterizeOptions {
        page_index,
        dpi,
        image_format: image_format.to_string(),
    };
    parse_format(&options.image_format)?;
    list_pdfs(directory)?;

    let renderer = PdfiumRenderer::bind(None)?;
    rasterize_directory(&renderer, directory, &options).map(|summary| summary.written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::cell::Cell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// 按文件名返回预设页数，未登记的文件视为损坏
    struct FakeRenderer {
        pages: HashMap<String, u16>,
        calls: Cell<usize>,
    }

    impl FakeRenderer {
        fn new(pages: &[(&str, u16)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(name, count)| (name.to_string(), *count))
                    .collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl PageRenderer for FakeRenderer {
        fn render_page(
            &self,
            pdf_path: &Path,
            page_index: u16,
            dpi: u32,
        ) -> Result<DynamicImage> {
            self.calls.set(self.calls.get() + 1);
            let name = pdf_path.file_name().unwrap().to_string_lossy().into_owned();
            let page_count = *self.pages.get(&name).ok_or_else(|| PdfError::Load {
                path: pdf_path.to_path_buf(),
                reason: "invalid header".to_string(),
            })?;
            if page_index >= page_count {
                return Err(PdfError::PageOutOfRange {
                    path: pdf_path.to_path_buf(),
                    page_index,
                    page_count,
                });
            }
            let side = dpi / 72;
            Ok(DynamicImage::ImageRgb8(RgbImage::new(side, side)))
        }
    }

    fn setup(names: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for name in names {
            fs::write(tmp.path().join(name), b"%PDF-1.7").unwrap();
        }
        tmp
    }

    #[test]
    fn test_short_document_is_skipped() {
        let tmp = setup(&["doc1.pdf", "doc2.pdf", "doc10.pdf", "notes.txt"]);
        let renderer = FakeRenderer::new(&[("doc1.pdf", 3), ("doc2.pdf", 1), ("doc10.pdf", 2)]);
        let options = RasterizeOptions {
            page_index: 1,
            ..Default::default()
        };

        let summary = rasterize_directory(&renderer, tmp.path(), &options).unwrap();

        assert_eq!(
            summary.written,
            vec![
                tmp.path().join("doc1_page_1.jpg"),
                tmp.path().join("doc10_page_1.jpg"),
            ]
        );
        assert!(summary.written.iter().all(|p| p.is_file()));
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].path, tmp.path().join("doc2.pdf"));
        assert!(!tmp.path().join("doc2_page_1.jpg").exists());
    }

    #[test]
    fn test_corrupt_document_does_not_stop_batch() {
        let tmp = setup(&["a.pdf", "broken.pdf"]);
        let renderer = FakeRenderer::new(&[("a.pdf", 1)]);
        let options = RasterizeOptions {
            image_format: "png".to_string(),
            ..Default::default()
        };

        let summary = rasterize_directory(&renderer, tmp.path(), &options).unwrap();
        assert_eq!(summary.written, vec![tmp.path().join("a_page_0.png")]);
        assert_eq!(summary.skipped.len(), 1);
        assert!(summary.skipped[0].reason.contains("invalid header"));
    }

    #[test]
    fn test_unsupported_format_rejected_before_rendering() {
        let tmp = setup(&["a.pdf"]);
        let renderer = FakeRenderer::new(&[("a.pdf", 1)]);
        let options = RasterizeOptions {
            image_format: "xyz".to_string(),
            ..Default::default()
        };

        let err = rasterize_directory(&renderer, tmp.path(), &options).unwrap_err();
        assert!(matches!(err, PdfError::UnsupportedFormat(_)));
        assert_eq!(renderer.calls.get(), 0);
    }

    #[test]
    fn test_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let renderer = FakeRenderer::new(&[]);
        let err = rasterize_directory(&renderer, &tmp.path().join("gone"), &Default::default())
            .unwrap_err();
        assert!(matches!(err, PdfError::NotFound(_)));
    }

    #[test]
    fn test_missing_directory_reported_before_binding() {
        let tmp = TempDir::new().unwrap();
        let err = save_pdf_page_as_image(&tmp.path().join("gone"), 0, 300, "jpg").unwrap_err();
        assert!(matches!(err, PdfError::NotFound(_)));
    }

    #[test]
    fn test_save_failure_reports_written_images() {
        let tmp = setup(&["a.pdf", "b.pdf", "c.pdf"]);
        // 输出路径被目录占用，写入失败
        fs::create_dir(tmp.path().join("b_page_0.jpg")).unwrap();
        let renderer = FakeRenderer::new(&[("a.pdf", 1), ("b.pdf", 1), ("c.pdf", 1)]);

        let err = rasterize_directory(&renderer, tmp.path(), &Default::default()).unwrap_err();
        match err {
            PdfError::Save { path, written, .. } => {
                assert_eq!(path, tmp.path().join("b_page_0.jpg"));
                assert_eq!(written, vec![tmp.path().join("a_page_0.jpg")]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(renderer.calls.get(), 2);
    }

    #[test]
    fn test_list_pdfs_is_not_recursive() {
        let tmp = setup(&["b.pdf", "a.PDF"]);
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("c.pdf"), b"%PDF").unwrap();

        let pdfs = list_pdfs(tmp.path()).unwrap();
        assert_eq!(pdfs, vec![tmp.path().join("b.pdf")]);
    }

    #[test]
    fn test_page_image_path() {
        let path = page_image_path(Path::new("/data"), Path::new("/data/report.v2.pdf"), 3, "png");
        assert_eq!(path, PathBuf::from("/data/report.v2_page_3.png"));
    }
}
