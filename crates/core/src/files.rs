//! 文件复制

use std::fs;
use std::path::{Path, PathBuf};

use crate::{DatasetError, Result};

/// 源文件与目标是否为同一文件（目标不存在时为否）
fn is_same_file(src: &Path, dest: &Path) -> bool {
    match (fs::canonicalize(src), fs::canonicalize(dest)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// 将文件复制到目标目录（不存在时自动创建），保留原文件名，覆盖同名文件
///
/// 源文件已位于目标目录时返回 [`DatasetError::SameFile`]，不会覆盖自身。
/// 任意一个文件复制失败即返回错误，剩余文件不再复制，已复制的文件保留。
/// 返回写入的目标路径。
pub fn copy_files_to_directory<P: AsRef<Path>>(
    file_paths: &[P],
    dest_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest_dir)?;

    log::info!(
        "[Copy] 复制 {} 个文件到 {}",
        file_paths.len(),
        dest_dir.display()
    );

    let mut copied = Vec::with_capacity(file_paths.len());
    for file_path in file_paths {
        let file_path = file_path.as_ref();
        let name = file_path
            .file_name()
            .ok_or_else(|| DatasetError::InvalidPath(file_path.to_path_buf()))?;
        let dest_file = dest_dir.join(name);

        if is_same_file(file_path, &dest_file) {
            return Err(DatasetError::SameFile(file_path.to_path_buf()));
        }

        fs::copy(file_path, &dest_file).map_err(|source| DatasetError::Copy {
            from: file_path.to_path_buf(),
            to: dest_file.clone(),
            source,
        })?;
        log::debug!("[Copy] {} -> {}", file_path.display(), dest_file.display());
        copied.push(dest_file);
    }

    log::info!(
        "[Copy] 成功复制 {} 个文件到 {}",
        copied.len(),
        dest_dir.display()
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_creates_destination_and_copies() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        let b = tmp.path().join("sub").join("b.txt");
        fs::create_dir_all(b.parent().unwrap()).unwrap();
        fs::write(&a, b"aaa").unwrap();
        fs::write(&b, b"bbb").unwrap();

        let dest = tmp.path().join("out").join("nested");
        let copied = copy_files_to_directory(&[&a, &b], &dest).unwrap();

        assert_eq!(copied, vec![dest.join("a.jpg"), dest.join("b.txt")]);
        assert_eq!(file_names(&dest), ["a.jpg", "b.txt"]);
        assert_eq!(fs::read(dest.join("b.txt")).unwrap(), b"bbb");
    }

    #[test]
    fn test_copy_twice_overwrites() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        fs::write(&a, b"first").unwrap();
        let dest = tmp.path().join("out");

        copy_files_to_directory(&[&a], &dest).unwrap();
        fs::write(&a, b"second").unwrap();
        copy_files_to_directory(&[&a], &dest).unwrap();

        assert_eq!(file_names(&dest), ["a.jpg"]);
        assert_eq!(fs::read(dest.join("a.jpg")).unwrap(), b"second");
    }

    #[test]
    fn test_copy_into_own_directory_keeps_content() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        fs::write(&a, b"precious").unwrap();

        let err = copy_files_to_directory(&[&a], tmp.path()).unwrap_err();
        assert!(matches!(err, DatasetError::SameFile(_)));
        assert_eq!(fs::read(&a).unwrap(), b"precious");
    }

    #[test]
    fn test_failure_stops_remaining_copies() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        let missing = tmp.path().join("missing.jpg");
        let c = tmp.path().join("c.jpg");
        fs::write(&a, b"a").unwrap();
        fs::write(&c, b"c").unwrap();
        let dest = tmp.path().join("out");

        let err = copy_files_to_directory(&[&a, &missing, &c], &dest).unwrap_err();
        assert!(matches!(err, DatasetError::Copy { .. }));
        assert_eq!(file_names(&dest), ["a.jpg"]);
    }

    #[test]
    fn test_empty_list_still_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("empty");
        let none: [&Path; 0] = [];

        let copied = copy_files_to_directory(&none, &dest).unwrap();
        assert!(copied.is_empty());
        assert!(dest.is_dir());
    }
}
