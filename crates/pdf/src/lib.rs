//! PDF page rasterization for dataset preparation.

mod error;
mod rasterize;
mod render;

pub use error::{PdfError, Result};
pub use rasterize::{
    list_pdfs, page_image_path, rasterize_directory, save_pdf_page_as_image, RasterizeOptions,
    RasterizeSummary, SkippedDocument,
};
pub use render::{pdfium_search_paths, scaled_size, PageRenderer, PdfiumRenderer, POINTS_PER_INCH};
