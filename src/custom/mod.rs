//! 自定义节点
pub mod parameter_set;
pub mod rx_custom_input;
pub mod schema;

use pyo3::{
    types::{PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

pub use rx_custom_input::RXCustomInput;

use crate::core::node::NodeRegister;

/// 自定义节点模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "custom")?;
    submodule.add_class::<RXCustomInput>()?;
    Ok(submodule)
}

/// 节点注册
pub fn node_register(py: Python<'_>) -> PyResult<Vec<NodeRegister<'_>>> {
    let nodes: Vec<NodeRegister> = vec![NodeRegister(
        "RXCustomInput",
        py.get_type::<RXCustomInput>(),
        "RX Custom Input Node",
    )];
    Ok(nodes)
}
