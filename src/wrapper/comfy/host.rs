//! 宿主提供的选项列表

use pyo3::Python;

use super::{folder_paths, samplers};

/// 宿主选项提供者
///
/// 节点声明输入输出时查询, 下拉框的候选值
pub trait HostChoices {
    /// 检查点名称
    fn checkpoints(&self) -> Vec<String>;
    /// 采样器名称
    fn samplers(&self) -> Vec<String>;
    /// 调度器名称
    fn schedulers(&self) -> Vec<String>;
}

/// ComfyUI 宿主
pub struct ComfyHost<'py> {
    py: Python<'py>,
}

impl<'py> ComfyHost<'py> {
    pub fn new(py: Python<'py>) -> Self {
        Self { py }
    }
}

impl HostChoices for ComfyHost<'_> {
    fn checkpoints(&self) -> Vec<String> {
        folder_paths::checkpoint_names(self.py)
    }

    fn samplers(&self) -> Vec<String> {
        samplers::sampler_names(self.py)
    }

    fn schedulers(&self) -> Vec<String> {
        samplers::scheduler_names(self.py)
    }
}
