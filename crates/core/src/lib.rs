//! Dataset path resolution and file bookkeeping for document-image datasets.

pub mod dataset;
pub mod files;
pub mod natsort;

pub use dataset::{get_im_pths, get_im_txt_pths, list_files, DatasetPaths, ExtensionSet};
pub use files::copy_files_to_directory;
pub use natsort::{natsort_paths, natural_cmp, natural_path_cmp};

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset directory {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("no images found in {} with extensions {extensions}", .dir.display())]
    NoImages { dir: PathBuf, extensions: ExtensionSet },
    #[error("no annotation files found in {}", .0.display())]
    NoAnnotations(PathBuf),
    #[error("mismatch: {images} images and {annotations} annotations found")]
    CountMismatch { images: usize, annotations: usize },
    #[error(
        "image {} is paired with annotation {} but their names differ",
        .image.display(),
        .annotation.display()
    )]
    UnpairedImage { image: PathBuf, annotation: PathBuf },
    #[error("path has no file name: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("source and destination are the same file: {}", .0.display())]
    SameFile(PathBuf),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
