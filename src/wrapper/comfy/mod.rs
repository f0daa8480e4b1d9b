//! ComfyUI 模块包装
pub mod folder_paths;
pub mod host;
pub mod samplers;

pub use host::{ComfyHost, HostChoices};
