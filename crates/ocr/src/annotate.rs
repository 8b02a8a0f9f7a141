//! OCR 结果可视化
//!
//! 在图片副本上绘制识别框与 `文字 (置信度)` 标签，写入图片上两级目录下的
//! `ocr_results/` 子目录，文件名追加 `_text_ocr` 后缀。

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::error::{AnnotateError, Result};
use crate::types::{BBox, OcrTextLine};

/// 内置标签字体（DejaVu Sans Mono）
const EMBEDDED_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// 标注配置
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotateOptions {
    /// 输出子目录名
    pub output_dir_name: String,
    /// 输出文件名后缀
    pub file_suffix: String,
    pub box_color: [u8; 3],
    pub text_color: [u8; 3],
    /// 边框线宽（像素）
    pub line_thickness: u32,
    /// 标签字号（像素）
    pub font_size: f32,
    /// 标签字体；为空时使用内置字体
    pub font_path: Option<PathBuf>,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            output_dir_name: "ocr_results".to_string(),
            file_suffix: "_text_ocr".to_string(),
            box_color: [255, 0, 0],
            text_color: [255, 0, 0],
            line_thickness: 2,
            font_size: 16.0,
            font_path: None,
        }
    }
}

fn load_font(path: &Path) -> Result<FontArc> {
    let data = fs::read(path).map_err(|e| AnnotateError::Font {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    FontArc::try_from_vec(data).map_err(|e| AnnotateError::Font {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 加载标签字体：指定的字体文件，或内置字体
pub fn resolve_font(font_path: Option<&Path>) -> Result<FontArc> {
    match font_path {
        Some(path) => load_font(path),
        None => FontArc::try_from_slice(EMBEDDED_FONT).map_err(|e| AnnotateError::Font {
            path: PathBuf::from("<embedded>"),
            reason: e.to_string(),
        }),
    }
}

/// 计算输出路径：`<图片上两级目录>/<output_dir_name>/<文件名><后缀>.<原扩展名>`
pub fn annotated_output_path(image_path: &Path, options: &AnnotateOptions) -> Result<PathBuf> {
    let stem = image_path
        .file_stem()
        .ok_or_else(|| AnnotateError::InvalidPath(image_path.to_path_buf()))?;

    // 根目录下的图片没有上两级目录，退回到其所在目录
    let grandparent = image_path
        .parent()
        .map(|parent| parent.parent().unwrap_or(parent))
        .unwrap_or_else(|| Path::new(""));

    let mut file_name = stem.to_os_string();
    file_name.push(&options.file_suffix);
    if let Some(ext) = image_path.extension() {
        file_name.push(".");
        file_name.push(ext);
    }

    Ok(grandparent.join(&options.output_dir_name).join(file_name))
}

/// 将边界框裁剪到图片范围内，完全在图片外或退化的框返回 `None`
fn clamp_rect(bbox: &BBox, width: u32, height: u32) -> Option<Rect> {
    let clamp = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as i64;

    let x0 = clamp(bbox.left.min(bbox.right), width);
    let x1 = clamp(bbox.left.max(bbox.right), width);
    let y0 = clamp(bbox.top.min(bbox.bottom), height);
    let y1 = clamp(bbox.top.max(bbox.bottom), height);

    if x1 - x0 < 1 || y1 - y0 < 1 {
        return None;
    }

    Some(Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32))
}

fn draw_box(img: &mut RgbImage, rect: Rect, thickness: u32, color: Rgb<u8>) {
    for t in 0..thickness.max(1) {
        let inner_w = rect.width().saturating_sub(2 * t);
        let inner_h = rect.height().saturating_sub(2 * t);
        if inner_w == 0 || inner_h == 0 {
            break;
        }
        let offset = t as i32;
        let inner = Rect::at(rect.left() + offset, rect.top() + offset).of_size(inner_w, inner_h);
        draw_hollow_rect_mut(img, inner, color);
    }
}

/// 在图片上绘制所有识别框和标签
///
/// 标签放在框的上方；框贴近图片顶部时放在框的下方。`font` 为空时只画边框。
pub fn draw_text_lines(
    img: &mut RgbImage,
    lines: &[OcrTextLine],
    font: Option<&FontArc>,
    options: &AnnotateOptions,
) -> usize {
    let (width, height) = img.dimensions();
    let box_color = Rgb(options.box_color);
    let text_color = Rgb(options.text_color);
    let scale = PxScale::from(options.font_size);

    let mut drawn = 0;
    for line in lines {
        let rect = match clamp_rect(&line.bbox, width, height) {
            Some(rect) => rect,
            None => {
                log::debug!("[Annotate] 跳过图片范围外的框: {:?}", line.bbox);
                continue;
            }
        };

        draw_box(img, rect, options.line_thickness, box_color);
        drawn += 1;

        if let Some(font) = font {
            let above = rect.top() - options.font_size.ceil() as i32 - 2;
            let text_y = if above >= 0 { above } else { rect.bottom() + 2 };
            draw_text_mut(img, text_color, rect.left(), text_y, scale, font, &line.label());
        }
    }

    drawn
}

/// 使用默认配置绘制 OCR 结果，返回输出图片路径
pub fn draw_ocr_boxes(image_path: &Path, ocr_result: &[OcrTextLine]) -> Result<PathBuf> {
    draw_ocr_boxes_with(image_path, ocr_result, &AnnotateOptions::default())
}

/// 绘制 OCR 结果并保存标注副本，返回输出图片路径
pub fn draw_ocr_boxes_with(
    image_path: &Path,
    ocr_result: &[OcrTextLine],
    options: &AnnotateOptions,
) -> Result<PathBuf> {
    let output_path = annotated_output_path(image_path, options)?;

    let mut img = image::open(image_path)
        .map_err(|source| AnnotateError::ImageOpen {
            path: image_path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    let font = resolve_font(options.font_path.as_deref())?;
    let drawn = draw_text_lines(&mut img, ocr_result, Some(&font), options);

    if let Some(dir) = output_path.parent() {
        fs::create_dir_all(dir)?;
    }

    img.save(&output_path)
        .map_err(|source| AnnotateError::ImageSave {
            path: output_path.clone(),
            source,
        })?;

    log::info!(
        "[Annotate] {} 个框 -> {}",
        drawn,
        output_path.display()
    );
    Ok(output_path)
}
