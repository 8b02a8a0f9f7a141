use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use docset_core::ExtensionSet;
use docset_ocr::AnnotateOptions;
use docset_pdf::RasterizeOptions;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    // ============ 数据集 ============
    /// 图片扩展名
    pub image_extensions: ExtensionSet,

    // ============ PDF 渲染 ============
    /// 渲染页码（从 0 开始）
    pub page_index: u16,
    /// 渲染 DPI
    pub dpi: u32,
    /// 输出图片格式
    pub image_format: String,
    /// pdfium 库所在目录
    pub pdfium_library_dir: Option<PathBuf>,

    // ============ OCR 标注 ============
    /// 标签字体
    pub font_path: Option<PathBuf>,
    /// 标签字号
    pub font_size: f32,
    /// 标注输出子目录名
    pub output_dir_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let raster = RasterizeOptions::default();
        let annotate = AnnotateOptions::default();
        Self {
            image_extensions: ExtensionSet::default(),
            page_index: raster.page_index,
            dpi: raster.dpi,
            image_format: raster.image_format,
            pdfium_library_dir: None,
            font_path: annotate.font_path,
            font_size: annotate.font_size,
            output_dir_name: annotate.output_dir_name,
        }
    }
}

impl AppConfig {
    pub fn rasterize_options(&self) -> RasterizeOptions {
        RasterizeOptions {
            page_index: self.page_index,
            dpi: self.dpi,
            image_format: self.image_format.clone(),
        }
    }

    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            output_dir_name: self.output_dir_name.clone(),
            font_size: self.font_size,
            font_path: self.font_path.clone(),
            ..AnnotateOptions::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 读取配置，文件不存在时返回默认配置
pub fn load_config(path: &Path) -> ConfigResult<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_config(path: &Path, config: &AppConfig) -> ConfigResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let raw = serde_json::to_string_pretty(config)?;
    fs::write(path, raw)?;
    Ok(())
}
