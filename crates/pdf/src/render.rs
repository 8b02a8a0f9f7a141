//! 页面渲染
//!
//! 使用 pdfium-render 将 PDF 页面渲染为位图。PDF 默认 72 DPI，
//! 渲染时在两个方向上按 `dpi / 72` 缩放。

use std::path::{Path, PathBuf};

use image::DynamicImage;
use pdfium_render::prelude::*;

use crate::error::{PdfError, Result};

/// PDF 坐标单位：每英寸 72 点
pub const POINTS_PER_INCH: f32 = 72.0;

/// 页面渲染器
pub trait PageRenderer {
    /// 打开文档并以指定 DPI 渲染单页
    ///
    /// 页码越界返回 [`PdfError::PageOutOfRange`]。
    fn render_page(&self, pdf_path: &Path, page_index: u16, dpi: u32) -> Result<DynamicImage>;
}

/// 按 DPI 计算目标像素尺寸
pub fn scaled_size(width_pt: f32, height_pt: f32, dpi: u32) -> (i32, i32) {
    let scale = dpi as f32 / POINTS_PER_INCH;
    (
        (width_pt * scale).round() as i32,
        (height_pt * scale).round() as i32,
    )
}

/// 获取 pdfium 库的搜索路径
///
/// 依次为：配置目录、可执行文件同级的 libs 目录、可执行文件同级目录、
/// 当前目录下的 libs 和当前目录。
pub fn pdfium_search_paths(library_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(dir) = library_dir {
        paths.push(dir.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join("libs"));
            paths.push(exe_dir.to_path_buf());
        }
    }

    paths.push(PathBuf::from("libs"));
    paths.push(PathBuf::from("./"));

    paths
}

/// 基于 pdfium 的渲染器
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// 绑定 pdfium 库，先查找搜索路径，最后尝试系统库
    pub fn bind(library_dir: Option<&Path>) -> Result<Self> {
        for path in pdfium_search_paths(library_dir) {
            let lib_path = Pdfium::pdfium_platform_library_name_at_path(&path);
            log::debug!("[Rasterize] 尝试加载 pdfium: {:?}", lib_path);

            if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
                log::info!("[Rasterize] 成功从 {:?} 加载 pdfium", path);
                return Ok(Self {
                    pdfium: Pdfium::new(bindings),
                });
            }
        }

        log::debug!("[Rasterize] 尝试加载系统 pdfium 库");
        Pdfium::bind_to_system_library()
            .map(|bindings| Self {
                pdfium: Pdfium::new(bindings),
            })
            .map_err(|e| PdfError::Bind(e.to_string()))
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render_page(&self, pdf_path: &Path, page_index: u16, dpi: u32) -> Result<DynamicImage> {
        let document = self
            .pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| PdfError::Load {
                path: pdf_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let page_count = document.pages().len();
        if page_index >= page_count {
            return Err(PdfError::PageOutOfRange {
                path: pdf_path.to_path_buf(),
                page_index,
                page_count,
            });
        }

        let render_err = |e: PdfiumError| PdfError::Render {
            path: pdf_path.to_path_buf(),
            page_index,
            reason: e.to_string(),
        };

        let page = document.pages().get(page_index).map_err(render_err)?;

        let page_width = page.width().value;
        let page_height = page.height().value;
        let (target_width, target_height) = scaled_size(page_width, page_height, dpi);

        log::debug!(
            "[Rasterize] 页面 {}: {}x{} pt -> {}x{} px (DPI: {})",
            page_index,
            page_width,
            page_height,
            target_width,
            target_height,
            dpi
        );

        let render_config = PdfRenderConfig::new()
            .set_target_width(target_width)
            .set_target_height(target_height);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(render_err)?;

        Ok(bitmap.as_image())
    }
}
