//! 文件夹路径
//!
//! 优先使用 ComfyUI 的 folder_paths 模块, 宿主不可用时按 ComfyUI 的目录结构扫描本地模型目录

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use log::{error, warn};
use pyo3::{types::PyAnyMethods, Python};
use walkdir::WalkDir;

use crate::error::Error;

/// 检查点文件夹名称
pub const FOLDER_CHECKPOINTS: &str = "checkpoints";

// 支持的模型文件扩展名
lazy_static! {
    static ref SUPPORTED_PT_EXTENSIONS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert(".ckpt");
        set.insert(".pt");
        set.insert(".pt2");
        set.insert(".bin");
        set.insert(".pth");
        set.insert(".safetensors");
        set.insert(".pkl");
        set.insert(".sft");
        set
    };
}

/// 文件夹路径配置结构体
#[allow(clippy::type_complexity)]
#[derive(Debug)]
pub struct FolderPaths {
    /// 基础路径
    base_path: PathBuf,
    /// 模型路径
    model_path: PathBuf,
    /// 文件夹名称和路径映射, (folders, extensions)
    folder_names_and_paths: BTreeMap<&'static str, (Vec<PathBuf>, HashSet<&'static str>)>,
}

impl Default for FolderPaths {
    /// 以当前工作目录 (ComfyUI 根目录) 创建实例
    fn default() -> Self {
        let base_path = std::env::current_dir().unwrap_or_else(|e| {
            warn!("failed to get current directory, {e}");
            PathBuf::from(".")
        });
        Self::from_base_directory(base_path)
    }
}

impl FolderPaths {
    /// 创建新的FolderPaths实例
    pub fn from_base_directory(base_directory: impl Into<PathBuf>) -> Self {
        let base_path = base_directory.into();
        let model_path = base_path.join("models");

        let mut folder_names_and_paths = BTreeMap::new();
        folder_names_and_paths.insert(
            FOLDER_CHECKPOINTS,
            (
                vec![model_path.join("checkpoints")],
                SUPPORTED_PT_EXTENSIONS.clone(),
            ),
        );

        Self {
            base_path,
            model_path,
            folder_names_and_paths,
        }
    }

    /// 获取基础路径
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 获取模型路径
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// 获取文件名列表
    ///
    /// 文件名相对于所在的模型目录, 使用 `/` 分隔, 已排序去重
    pub fn get_filename_list(&self, folder_name: &str) -> Result<Vec<String>, Error> {
        let (dir_paths, extensions) = self
            .folder_names_and_paths
            .get(folder_name)
            .ok_or_else(|| Error::InvalidDirectory(format!("folder {folder_name} not found")))?;

        let mut output_list = HashSet::new();
        for dir_path in dir_paths {
            if !dir_path.is_dir() {
                continue;
            }
            output_list.extend(scan_folder(dir_path, extensions));
        }

        let mut sorted_list: Vec<String> = output_list.into_iter().collect();
        sorted_list.sort_unstable();
        Ok(sorted_list)
    }
}

/// 递归扫描目录, 返回匹配扩展名的相对路径
///
/// 无法读取的条目 (符号链接循环、无权限目录、失效链接) 跳过, 不影响其余文件
fn scan_folder(dir_path: &Path, extensions: &HashSet<&'static str>) -> Vec<String> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir_path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skip unreadable entry in {}, {e}", dir_path.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_lowercase();
        if !extensions.iter().any(|ext| file_name.ends_with(ext)) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(dir_path) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(relative);
    }

    files
}

/// 通过 ComfyUI folder_paths 模块获取文件名列表
///
/// ```python
/// folder_paths.get_filename_list("checkpoints")
/// ```
pub fn host_filename_list(py: Python<'_>, folder_name: &str) -> Result<Vec<String>, Error> {
    let list = py
        .import("folder_paths")?
        .getattr("get_filename_list")?
        .call1((folder_name,))?
        .extract::<Vec<String>>()?;
    Ok(list)
}

/// 获取检查点名称列表
///
/// 宿主模块不可用时回退到本地目录扫描
pub fn checkpoint_names(py: Python<'_>) -> Vec<String> {
    match host_filename_list(py, FOLDER_CHECKPOINTS) {
        Ok(list) => list,
        Err(e) => {
            warn!("comfyui folder_paths unavailable, scanning local models directory, {e}");
            FolderPaths::default()
                .get_filename_list(FOLDER_CHECKPOINTS)
                .unwrap_or_else(|e| {
                    error!("get checkpoint list failed, {e}");
                    Vec::new()
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_folder_paths_initialization() -> anyhow::Result<()> {
        let folder_paths = FolderPaths::from_base_directory("/comfyui");
        assert_eq!(folder_paths.base_path(), Path::new("/comfyui"));
        assert_eq!(folder_paths.model_path(), Path::new("/comfyui/models"));
        assert!(folder_paths
            .folder_names_and_paths
            .contains_key(FOLDER_CHECKPOINTS));
        Ok(())
    }

    #[test]
    fn test_get_filename_list() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let checkpoints = tmp.path().join("models").join("checkpoints");
        fs::create_dir_all(checkpoints.join("sdxl"))?;
        fs::create_dir_all(checkpoints.join(".git"))?;
        fs::write(checkpoints.join("b.safetensors"), b"")?;
        fs::write(checkpoints.join("A.CKPT"), b"")?;
        fs::write(checkpoints.join("sdxl").join("sd_xl.safetensors"), b"")?;
        fs::write(checkpoints.join("readme.txt"), b"")?;
        fs::write(checkpoints.join(".git").join("x.pt"), b"")?;

        let folder_paths = FolderPaths::from_base_directory(tmp.path());
        let list = folder_paths.get_filename_list(FOLDER_CHECKPOINTS)?;

        assert_eq!(
            list,
            vec![
                "A.CKPT".to_string(),
                "b.safetensors".to_string(),
                "sdxl/sd_xl.safetensors".to_string(),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_get_filename_list_missing_folder() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let folder_paths = FolderPaths::from_base_directory(tmp.path());
        assert!(folder_paths.get_filename_list(FOLDER_CHECKPOINTS)?.is_empty());
        assert!(folder_paths.get_filename_list("unknown").is_err());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_get_filename_list_skips_symlink_loop() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let checkpoints = tmp.path().join("models").join("checkpoints");
        fs::create_dir_all(&checkpoints)?;
        fs::write(checkpoints.join("a.safetensors"), b"")?;
        std::os::unix::fs::symlink(&checkpoints, checkpoints.join("loop"))?;

        let folder_paths = FolderPaths::from_base_directory(tmp.path());
        let list = folder_paths.get_filename_list(FOLDER_CHECKPOINTS)?;

        assert_eq!(list, vec!["a.safetensors".to_string()]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_get_filename_list_skips_broken_link() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let checkpoints = tmp.path().join("models").join("checkpoints");
        fs::create_dir_all(&checkpoints)?;
        fs::write(checkpoints.join("b.ckpt"), b"")?;
        std::os::unix::fs::symlink(tmp.path().join("missing"), checkpoints.join("gone.safetensors"))?;

        let folder_paths = FolderPaths::from_base_directory(tmp.path());
        let list = folder_paths.get_filename_list(FOLDER_CHECKPOINTS)?;

        assert_eq!(list, vec!["b.ckpt".to_string()]);
        Ok(())
    }
}
