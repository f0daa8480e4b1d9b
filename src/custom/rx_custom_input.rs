//! RX 自定义输入节点
//!
//! 汇总模型、提示词、采样器/调度器与生成参数, 原样输出给下游节点

use log::{debug, error, info};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyTuple, PyType},
    Bound, Py, PyErr, PyResult, Python,
};

use crate::{
    core::{category::CATEGORY_CUSTOM, PromptServer},
    custom::{
        parameter_set::{OptionalInputs, ParameterSet, ParameterTuple, FIELD_NAMES},
        schema::{input_spec, output_spec},
    },
    error::Error,
    wrapper::comfy::ComfyHost,
};

/// RX 自定义输入
#[pyclass(subclass)]
pub struct RXCustomInput {}

impl PromptServer for RXCustomInput {}

#[pymethods]
impl RXCustomInput {
    #[new]
    fn new() -> Self {
        Self {}
    }

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| input_spec(&ComfyHost::new(py)).build(py))
    }

    /// 变更检测, 返回值与上次执行不同时节点重新执行
    #[classmethod]
    #[pyo3(
        name = "IS_CHANGED",
        signature = (
            model_name,
            prompt,
            negative_prompt,
            sampler=None,
            scheduler=None,
            steps=None,
            cfg=None,
            seed=None,
            width=None,
            height=None
        )
    )]
    #[allow(clippy::too_many_arguments)]
    fn is_changed(
        _cls: &Bound<'_, PyType>,
        py: Python<'_>,
        model_name: String,
        prompt: String,
        negative_prompt: String,
        sampler: Option<String>,
        scheduler: Option<String>,
        steps: Option<i64>,
        cfg: Option<f64>,
        seed: Option<i64>,
        width: Option<i64>,
        height: Option<i64>,
    ) -> PyResult<String> {
        debug!("RXCustomInput IS_CHANGED called");

        let params = ParameterSet::resolve(
            model_name,
            prompt,
            negative_prompt,
            OptionalInputs {
                sampler,
                scheduler,
                steps,
                cfg,
                seed,
                width,
                height,
            },
            &ComfyHost::new(py),
        );

        params.fingerprint().map_err(|e| {
            error!("RXCustomInput fingerprint failed, {e}");
            PyErr::new::<PyRuntimeError, _>(e.to_string())
        })
    }

    #[classattr]
    #[pyo3(name = "INPUT_IS_LIST")]
    fn input_is_list() -> bool {
        false
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_NODE")]
    fn output_node() -> bool {
        false
    }

    // 检查点/采样器/调度器输出为宿主的选项列表
    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types(py: Python<'_>) -> PyResult<Py<PyTuple>> {
        Ok(output_spec(&ComfyHost::new(py)).types_tuple(py)?.unbind())
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names(py: Python<'_>) -> PyResult<Py<PyTuple>> {
        Ok(PyTuple::new(py, FIELD_NAMES)?.unbind())
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list(py: Python<'_>) -> PyResult<Py<PyTuple>> {
        Ok(PyTuple::new(py, [false; FIELD_NAMES.len()])?.unbind())
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_CUSTOM;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Collects the checkpoint, prompts, sampler/scheduler and generation parameters in one place.\n\
         All values are passed through unchanged, in declared order, to downstream nodes."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "test";

    #[pyo3(
        name = "test",
        signature = (
            model_name,
            prompt,
            negative_prompt,
            sampler=None,
            scheduler=None,
            steps=None,
            cfg=None,
            seed=None,
            width=None,
            height=None
        )
    )]
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        py: Python<'_>,
        model_name: String,
        prompt: String,
        negative_prompt: String,
        sampler: Option<String>,
        scheduler: Option<String>,
        steps: Option<i64>,
        cfg: Option<f64>,
        seed: Option<i64>,
        width: Option<i64>,
        height: Option<i64>,
    ) -> PyResult<ParameterTuple> {
        let params = ParameterSet::resolve(
            model_name,
            prompt,
            negative_prompt,
            OptionalInputs {
                sampler,
                scheduler,
                steps,
                cfg,
                seed,
                width,
                height,
            },
            &ComfyHost::new(py),
        );

        match self.pass_through(params) {
            Ok(v) => Ok(v),
            Err(e) => {
                error!("RXCustomInput error, {e}");
                if let Err(e) = self.send_error(py, "RXCustomInput", e.to_string()) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl RXCustomInput {
    /// 记录输入并原样返回
    fn pass_through(&self, params: ParameterSet) -> Result<ParameterTuple, Error> {
        info!("RXCustomInput input: {}", serde_json::to_string(&params)?);
        Ok(params.into_tuple())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pyo3::types::{PyAnyMethods, PyList};

    use super::*;
    use crate::custom::parameter_set::tests::example_tuple;

    #[test]
    fn test_pass_through() -> anyhow::Result<()> {
        let node = RXCustomInput::new();
        let input = example_tuple();
        let output = node.pass_through(ParameterSet::from(input.clone()))?;
        assert_eq!(output, input);
        Ok(())
    }

    /// 宿主模块不可用时, 走本地回退
    #[test]
    fn test_input_types() -> anyhow::Result<()> {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| -> anyhow::Result<()> {
            let cls = py.get_type::<RXCustomInput>();
            let input_types = cls.call_method0("INPUT_TYPES")?;

            let required = input_types.get_item("required")?;
            assert_eq!(required.len()?, 3);
            let model_name = required.get_item("model_name")?;
            assert!(model_name.get_item(0)?.is_instance_of::<PyList>());
            assert_eq!(
                model_name
                    .get_item(1)?
                    .get_item("tooltip")?
                    .extract::<String>()?,
                "The name of the checkpoint (model) to load."
            );

            let prompt = required.get_item("prompt")?;
            assert_eq!(prompt.get_item(0)?.extract::<String>()?, "STRING");
            assert!(prompt.get_item(1)?.get_item("multiline")?.extract::<bool>()?);

            let optional = input_types.get_item("optional")?;
            assert_eq!(optional.len()?, 7);
            let sampler = optional.get_item("sampler")?.get_item(0)?;
            assert_eq!(sampler.get_item(0)?.extract::<String>()?, "euler");

            let steps = optional.get_item("steps")?;
            assert_eq!(steps.get_item(0)?.extract::<String>()?, "INT");
            let params: HashMap<String, i64> = steps.get_item(1)?.extract()?;
            assert_eq!(
                params,
                HashMap::from([
                    ("default".to_string(), 25),
                    ("min".to_string(), 1),
                    ("max".to_string(), 150),
                    ("step".to_string(), 1),
                ])
            );

            assert_eq!(input_types.get_item("hidden")?.len()?, 0);
            Ok(())
        })
    }

    #[test]
    fn test_class_attributes() -> anyhow::Result<()> {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| -> anyhow::Result<()> {
            let cls = py.get_type::<RXCustomInput>();

            let return_types = cls.getattr("RETURN_TYPES")?;
            assert_eq!(return_types.len()?, FIELD_NAMES.len());
            assert!(return_types.get_item(0)?.is_instance_of::<PyList>());
            assert_eq!(return_types.get_item(1)?.extract::<String>()?, "STRING");
            assert_eq!(
                return_types.get_item(3)?.get_item(0)?.extract::<String>()?,
                "euler"
            );
            assert_eq!(
                return_types.get_item(4)?.get_item(0)?.extract::<String>()?,
                "normal"
            );
            assert_eq!(return_types.get_item(6)?.extract::<String>()?, "FLOAT");

            let return_names: Vec<String> = cls.getattr("RETURN_NAMES")?.extract()?;
            assert_eq!(return_names, FIELD_NAMES.to_vec());

            let output_is_list: Vec<bool> = cls.getattr("OUTPUT_IS_LIST")?.extract()?;
            assert_eq!(output_is_list, vec![false; FIELD_NAMES.len()]);

            assert!(!cls.getattr("OUTPUT_NODE")?.extract::<bool>()?);
            assert!(!cls.getattr("INPUT_IS_LIST")?.extract::<bool>()?);
            assert_eq!(cls.getattr("FUNCTION")?.extract::<String>()?, "test");
            assert_eq!(
                cls.getattr("CATEGORY")?.extract::<String>()?,
                CATEGORY_CUSTOM
            );
            Ok(())
        })
    }

    #[test]
    fn test_execute_from_python() -> anyhow::Result<()> {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| -> anyhow::Result<()> {
            let cls = py.get_type::<RXCustomInput>();
            let node = cls.call0()?;

            let input = example_tuple();
            let output: ParameterTuple = node.call_method1("test", input.clone())?.extract()?;
            assert_eq!(output, input);

            let output: ParameterTuple = node.call_method1("test", ("m", "p", "n"))?.extract()?;
            assert_eq!(
                output,
                (
                    "m".to_string(),
                    "p".to_string(),
                    "n".to_string(),
                    "euler".to_string(),
                    "normal".to_string(),
                    25,
                    5.0,
                    -1,
                    1024,
                    1536,
                )
            );
            Ok(())
        })
    }

    #[test]
    fn test_is_changed_from_python() -> anyhow::Result<()> {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| -> anyhow::Result<()> {
            let cls = py.get_type::<RXCustomInput>();

            let fingerprint: String = cls.call_method1("IS_CHANGED", example_tuple())?.extract()?;
            assert_eq!(
                fingerprint,
                r#""sd_xl.safetensors"-"a cat"-""-"euler"-"normal"-25-5.0--1-1024-1536"#
            );

            let again: String = cls.call_method1("IS_CHANGED", example_tuple())?.extract()?;
            assert_eq!(fingerprint, again);
            Ok(())
        })
    }
}
