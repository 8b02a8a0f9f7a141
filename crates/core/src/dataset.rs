//! 数据集路径解析
//!
//! 扫描数据集目录，按扩展名筛选图片与 YOLO 标注文件（`.txt`），自然排序后校验数量与配对。

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::natsort::natsort_paths;
use crate::{DatasetError, Result};

/// 默认图片扩展名
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".png", ".tiff"];

/// 标注文件扩展名
pub const ANNOTATION_EXTENSION: &str = ".txt";

/// 扩展名集合（小写，带前导 `.`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionSet(Vec<String>);

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if ext.is_empty() {
                continue;
            }
            let ext = format!(".{}", ext);
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        Self(normalized)
    }

    /// 标注文件集合（仅 `.txt`）
    pub fn annotations() -> Self {
        Self::new([ANNOTATION_EXTENSION])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// 路径扩展名是否在集合中（不区分大小写）
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = format!(".{}", ext.to_lowercase());
                self.0.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_EXTENSIONS)
    }
}

impl From<Vec<String>> for ExtensionSet {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<ExtensionSet> for Vec<String> {
    fn from(value: ExtensionSet) -> Self {
        value.0
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// 图片与标注路径（按位置一一对应）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetPaths {
    pub images: Vec<PathBuf>,
    pub annotations: Vec<PathBuf>,
}

impl DatasetPaths {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// 按位置配对后的 (图片, 标注)
    pub fn pairs(&self) -> impl Iterator<Item = (&Path, &Path)> + '_ {
        self.images
            .iter()
            .zip(self.annotations.iter())
            .map(|(im, txt)| (im.as_path(), txt.as_path()))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// 递归列出目录下匹配扩展名的文件，结果已自然排序
///
/// 跟随符号链接，跳过以 `.` 开头的文件和目录。根目录不可读时返回错误，
/// 子目录读取失败只记录警告。
pub fn list_files(dir: &Path, extensions: &ExtensionSet) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                log::warn!("[Dataset] 跳过无法读取的条目: {}", err);
                continue;
            }
        };

        if entry.file_type().is_file() && extensions.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    natsort_paths(&mut files);
    Ok(files)
}

fn ensure_dir_exists(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(DatasetError::NotFound(dir.to_path_buf()));
    }
    Ok(())
}

fn collect_images(dir: &Path, extensions: &ExtensionSet) -> Result<Vec<PathBuf>> {
    let images = list_files(dir, extensions)?;
    if images.is_empty() {
        return Err(DatasetError::NoImages {
            dir: dir.to_path_buf(),
            extensions: extensions.clone(),
        });
    }
    Ok(images)
}

/// 校验按位置配对的图片与标注文件名（不含扩展名）一致
fn verify_pairing(images: &[PathBuf], annotations: &[PathBuf]) -> Result<()> {
    for (image, annotation) in images.iter().zip(annotations) {
        if image.file_stem() != annotation.file_stem() {
            return Err(DatasetError::UnpairedImage {
                image: image.clone(),
                annotation: annotation.clone(),
            });
        }
    }
    Ok(())
}

/// 获取图片及其对应的 YOLO 标注文件路径
///
/// 两个列表均自然排序，按位置配对；数量不一致或同一位置文件名不一致时返回错误。
pub fn get_im_txt_pths(dataset_dir: &Path, extensions: &ExtensionSet) -> Result<DatasetPaths> {
    ensure_dir_exists(dataset_dir)?;

    let images = collect_images(dataset_dir, extensions)?;
    let annotations = list_files(dataset_dir, &ExtensionSet::annotations())?;

    if annotations.is_empty() {
        return Err(DatasetError::NoAnnotations(dataset_dir.to_path_buf()));
    }

    if images.len() != annotations.len() {
        return Err(DatasetError::CountMismatch {
            images: images.len(),
            annotations: annotations.len(),
        });
    }

    verify_pairing(&images, &annotations)?;

    log::info!(
        "[Dataset] {}: {} 对图片/标注",
        dataset_dir.display(),
        images.len()
    );

    Ok(DatasetPaths {
        images,
        annotations,
    })
}

/// 获取图片路径（自然排序）
pub fn get_im_pths(dataset_dir: &Path, extensions: &ExtensionSet) -> Result<Vec<PathBuf>> {
    ensure_dir_exists(dataset_dir)?;

    let images = collect_images(dataset_dir, extensions)?;
    log::info!("[Dataset] {}: {} 张图片", dataset_dir.display(), images.len());
    Ok(images)
}
