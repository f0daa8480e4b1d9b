//! ComfyUI 节点输入输出构建器
//!
//! 提供类型安全、易用的构建器 API，用于生成 ComfyUI 节点的 INPUT_TYPES / RETURN_TYPES
//!
//! # 使用示例
//!
//! ```rust,ignore
//! Python::with_gil(|py| {
//!     InputSpec::new()
//!         .with_required("text", InputType::string().default("hello").multiline(true))
//!         .with_optional("count", InputType::int().default(10).min(0).max(100).step(1))
//!         .with_optional("mode", InputType::choices(vec!["A".to_string(), "B".to_string()]))
//!         .build(py)
//! })
//! ```

use indexmap::IndexMap;
use pyo3::{
    types::{PyDict, PyDictMethods, PyList, PyTuple},
    Bound, IntoPyObject, Py, PyAny, PyResult, Python,
};

use crate::core::types::{NODE_FLOAT, NODE_INT, NODE_STRING};

/// 输入规范构建器
///
/// 用于构建 ComfyUI 节点的 INPUT_TYPES 字典结构
#[derive(Debug, Clone, Default)]
pub struct InputSpec {
    required: Vec<(String, InputType)>,
    optional: Vec<(String, InputType)>,
}

impl InputSpec {
    /// 创建一个新的输入规范构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加必需输入
    pub fn with_required(mut self, name: impl Into<String>, input: InputType) -> Self {
        self.required.push((name.into(), input));
        self
    }

    /// 添加可选输入
    pub fn with_optional(mut self, name: impl Into<String>, input: InputType) -> Self {
        self.optional.push((name.into(), input));
        self
    }

    pub fn required(&self) -> &[(String, InputType)] {
        &self.required
    }

    pub fn optional(&self) -> &[(String, InputType)] {
        &self.optional
    }

    /// 按声明顺序返回全部字段 (required -> optional)
    pub fn fields(&self) -> impl Iterator<Item = &(String, InputType)> {
        self.required.iter().chain(self.optional.iter())
    }

    /// 按名称查找字段
    pub fn field(&self, name: &str) -> Option<&InputType> {
        self.fields().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    /// 构建 PyDict
    ///
    /// 生成符合 ComfyUI INPUT_TYPES 格式的字典结构
    pub fn build(self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let dict = PyDict::new(py);

        let required = PyDict::new(py);
        for (name, input_type) in self.required {
            required.set_item(name, input_type.to_py_tuple(py)?)?;
        }
        dict.set_item("required", required)?;

        let optional = PyDict::new(py);
        for (name, input_type) in self.optional {
            optional.set_item(name, input_type.to_py_tuple(py)?)?;
        }
        dict.set_item("optional", optional)?;

        // 节点没有隐藏输入, 保留空分组
        dict.set_item("hidden", PyDict::new(py))?;

        Ok(dict.into())
    }
}

/// 输入类型枚举（仅表示类型，不包含参数）
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    String,
    Int,
    Float,
    /// 下拉选项, 选项列表代替类型名称
    Choices(Vec<String>),
}

/// 参数值
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// 数值参数转换为 f64, 非数值返回 None
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            ParamValue::String(_) | ParamValue::Bool(_) => None,
        }
    }
}

/// 输入类型（包含类型和参数）
#[derive(Debug, Clone)]
pub struct InputType {
    kind: InputKind,
    params: IndexMap<&'static str, ParamValue>,
}

impl InputType {
    fn new(kind: InputKind) -> Self {
        Self {
            kind,
            params: IndexMap::new(),
        }
    }

    /// String 类型
    pub fn string() -> Self {
        Self::new(InputKind::String)
    }

    /// Int 类型
    pub fn int() -> Self {
        Self::new(InputKind::Int)
    }

    /// Float 类型
    pub fn float() -> Self {
        Self::new(InputKind::Float)
    }

    /// 动态选项列表
    pub fn choices(options: Vec<String>) -> Self {
        Self::new(InputKind::Choices(options))
    }

    pub fn kind(&self) -> &InputKind {
        &self.kind
    }

    /// 获取参数
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }
}

impl InputType {
    /// 设置默认值
    pub fn default<V: Into<ParamValue>>(mut self, value: V) -> Self {
        self.params.insert("default", value.into());
        self
    }

    /// 设置提示文本
    pub fn tooltip(mut self, value: impl Into<String>) -> Self {
        self.params.insert("tooltip", ParamValue::String(value.into()));
        self
    }

    /// 设置最小值
    pub fn min<V: Into<ParamValue>>(mut self, value: V) -> Self {
        self.params.insert("min", value.into());
        self
    }

    /// 设置最大值
    pub fn max<V: Into<ParamValue>>(mut self, value: V) -> Self {
        self.params.insert("max", value.into());
        self
    }

    /// 设置步长
    pub fn step<V: Into<ParamValue>>(mut self, value: V) -> Self {
        self.params.insert("step", value.into());
        self
    }

    /// 设置多行文本
    pub fn multiline(mut self, multiline: bool) -> Self {
        self.params.insert("multiline", ParamValue::Bool(multiline));
        self
    }

    /// 转换为 Python 元组
    ///
    /// 选项类型：(options_list, params_dict)
    /// 其他类型：(type_name, params_dict)
    fn to_py_tuple<'py>(self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let params_dict = self.params.to_py_dict(py)?;

        let type_str = match self.kind {
            InputKind::Choices(options) => {
                return Ok((options, params_dict).into_pyobject(py)?.into_any());
            }
            InputKind::String => NODE_STRING,
            InputKind::Int => NODE_INT,
            InputKind::Float => NODE_FLOAT,
        };
        Ok((type_str, params_dict).into_pyobject(py)?.into_any())
    }
}

/// 将 IndexMap<&str, ParamValue> 转换为 PyDict
trait ToPyDict {
    fn to_py_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>>;
}

impl ToPyDict for IndexMap<&'static str, ParamValue> {
    fn to_py_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        for (key, value) in self {
            match value {
                ParamValue::String(s) => dict.set_item(*key, s.as_str())?,
                ParamValue::Int(i) => dict.set_item(*key, *i)?,
                ParamValue::Float(f) => dict.set_item(*key, *f)?,
                ParamValue::Bool(b) => dict.set_item(*key, *b)?,
            }
        }
        Ok(dict)
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// 输出类型
#[derive(Debug, Clone, PartialEq)]
pub enum OutputType {
    /// 类型名称, 如 "STRING"
    Named(&'static str),
    /// 下拉选项, 下游节点按选项列表匹配
    Choices(Vec<String>),
}

/// 输出规范
///
/// RETURN_TYPES 与 RETURN_NAMES 一一对应
#[derive(Debug, Clone, Default)]
pub struct OutputSpec {
    types: Vec<OutputType>,
    names: Vec<&'static str>,
}

impl OutputSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output_type: OutputType, name: &'static str) -> Self {
        self.types.push(output_type);
        self.names.push(name);
        self
    }

    pub fn types(&self) -> &[OutputType] {
        &self.types
    }

    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// RETURN_TYPES 元组
    pub fn types_tuple<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyTuple>> {
        let mut items: Vec<Bound<'py, PyAny>> = Vec::with_capacity(self.types.len());
        for output_type in &self.types {
            let item = match output_type {
                OutputType::Named(name) => (*name).into_pyobject(py)?.into_any(),
                OutputType::Choices(options) => PyList::new(py, options)?.into_any(),
            };
            items.push(item);
        }
        PyTuple::new(py, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试 InputSpec 构建器
    #[test]
    fn test_input_spec_builder() -> anyhow::Result<()> {
        let spec = InputSpec::new()
            .with_required("text", InputType::string().default("hello"))
            .with_optional("count", InputType::int().default(10).min(0).max(100))
            .with_optional("ratio", InputType::float().default(0.5));

        assert_eq!(spec.required().len(), 1);
        assert_eq!(spec.optional().len(), 2);
        assert_eq!(spec.required()[0].0, "text");
        assert_eq!(
            spec.field("count").and_then(|t| t.param("max")),
            Some(&ParamValue::Int(100))
        );
        Ok(())
    }

    /// 测试字段顺序
    #[test]
    fn test_fields_order() -> anyhow::Result<()> {
        let spec = InputSpec::new()
            .with_optional("b", InputType::int())
            .with_required("a", InputType::string())
            .with_optional("c", InputType::float());

        let names: Vec<&str> = spec.fields().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        Ok(())
    }

    /// 测试选项类型
    #[test]
    fn test_choices_input_type() -> anyhow::Result<()> {
        let options = vec!["A".to_string(), "B".to_string()];
        let spec = InputSpec::new().with_required(
            "mode",
            InputType::choices(options.clone()).tooltip("mode"),
        );

        assert_eq!(
            spec.field("mode").map(|t| t.kind()),
            Some(&InputKind::Choices(options))
        );
        Ok(())
    }

    /// 测试参数覆盖
    #[test]
    fn test_param_override() -> anyhow::Result<()> {
        let input = InputType::float().default(1.0).default(2.5);
        assert_eq!(input.param("default").and_then(|v| v.as_f64()), Some(2.5));
        assert_eq!(input.param("multiline"), None);
        Ok(())
    }

    /// 测试输出规范
    #[test]
    fn test_output_spec() -> anyhow::Result<()> {
        let spec = OutputSpec::new()
            .with_output(OutputType::Named(NODE_STRING), "text")
            .with_output(OutputType::Choices(vec!["x".to_string()]), "choice");

        assert_eq!(spec.types().len(), spec.names().len());
        assert_eq!(spec.names(), &["text", "choice"]);
        Ok(())
    }
}
