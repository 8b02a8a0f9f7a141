mod config;

pub use config::{load_config, save_config, AppConfig, ConfigError, ConfigResult};

pub use docset_core::{
    copy_files_to_directory, get_im_pths, get_im_txt_pths, DatasetError, DatasetPaths,
    ExtensionSet,
};
pub use docset_ocr::{
    draw_ocr_boxes, draw_ocr_boxes_with, load_ocr_result, AnnotateError, AnnotateOptions, BBox,
    OcrResult, OcrTextLine,
};
pub use docset_pdf::{
    rasterize_directory, save_pdf_page_as_image, PageRenderer, PdfError, PdfiumRenderer,
    RasterizeOptions, RasterizeSummary,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(
    name = "docset-prep",
    version,
    about = "文档图片数据集准备工具：配对图片与标注、复制文件、渲染 PDF 页面、绘制 OCR 结果"
)]
pub struct Cli {
    /// 配置文件（JSON），不存在时使用默认配置
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 列出图片与 YOLO 标注文件配对
    Pairs {
        dir: PathBuf,
        /// 图片扩展名，可重复；默认取配置
        #[arg(long = "ext")]
        extensions: Vec<String>,
    },
    /// 列出图片
    Images {
        dir: PathBuf,
        #[arg(long = "ext")]
        extensions: Vec<String>,
    },
    /// 复制文件到目标目录
    Copy {
        dest: PathBuf,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// 渲染目录中每个 PDF 的指定页面
    Rasterize {
        dir: PathBuf,
        #[arg(long)]
        page: Option<u16>,
        #[arg(long)]
        dpi: Option<u32>,
        #[arg(long)]
        format: Option<String>,
        /// pdfium 库所在目录
        #[arg(long)]
        pdfium_dir: Option<PathBuf>,
    },
    /// 在图片上绘制 OCR 结果
    Annotate {
        image: PathBuf,
        /// OCR 结果 JSON
        ocr_json: PathBuf,
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

fn extension_set(cli_exts: Vec<String>, config: &AppConfig) -> ExtensionSet {
    if cli_exts.is_empty() {
        config.image_extensions.clone()
    } else {
        ExtensionSet::new(cli_exts)
    }
}

/// 执行子命令
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?,
        None => AppConfig::default(),
    };

    match cli.command {
        Command::Pairs { dir, extensions } => {
            let extensions = extension_set(extensions, &config);
            let paths = get_im_txt_pths(&dir, &extensions)?;
            for (image, annotation) in paths.pairs() {
                println!("{}\t{}", image.display(), annotation.display());
            }
        }
        Command::Images { dir, extensions } => {
            let extensions = extension_set(extensions, &config);
            for image in get_im_pths(&dir, &extensions)? {
                println!("{}", image.display());
            }
        }
        Command::Copy { dest, files } => {
            copy_files_to_directory(&files, &dest)?;
        }
        Command::Rasterize {
            dir,
            page,
            dpi,
            format,
            pdfium_dir,
        } => {
            let mut options = config.rasterize_options();
            if let Some(page) = page {
                options.page_index = page;
            }
            if let Some(dpi) = dpi {
                options.dpi = dpi;
            }
            if let Some(format) = format {
                options.image_format = format;
            }
            let library_dir = pdfium_dir.or(config.pdfium_library_dir.clone());

            let renderer = PdfiumRenderer::bind(library_dir.as_deref())?;
            let summary = rasterize_directory(&renderer, &dir, &options)
                .with_context(|| format!("渲染 {} 失败", dir.display()))?;
            for path in &summary.written {
                println!("{}", path.display());
            }
            if !summary.skipped.is_empty() {
                log::warn!("跳过 {} 个文档", summary.skipped.len());
            }
        }
        Command::Annotate {
            image,
            ocr_json,
            font,
        } => {
            let mut options = config.annotate_options();
            if font.is_some() {
                options.font_path = font;
            }
            let result = load_ocr_result(&ocr_json)
                .with_context(|| format!("无法读取 OCR 结果 {}", ocr_json.display()))?;
            let output = draw_ocr_boxes_with(&image, &result, &options)?;
            println!("{}", output.display());
        }
    }

    Ok(())
}
