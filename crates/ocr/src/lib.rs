//! OCR 结果类型与可视化
//!
//! OCR 引擎本身不在此 crate 中，识别结果以 JSON 或 [`OcrTextLine`] 传入。

mod annotate;
mod error;
mod types;

pub use annotate::{
    annotated_output_path, draw_ocr_boxes, draw_ocr_boxes_with, draw_text_lines, resolve_font,
    AnnotateOptions,
};
pub use error::{AnnotateError, Result};
pub use types::{load_ocr_result, BBox, OcrResult, OcrTextLine};
