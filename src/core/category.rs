//! 节点分类

/// 自定义节点
pub const CATEGORY_CUSTOM: &str = "Custom Nodes";
