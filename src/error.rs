//! 错误处理

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serde json error, {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("py error, {0}")]
    PyErr(#[from] pyo3::PyErr),

    #[error("invalid directory, {0}")]
    InvalidDirectory(String),
}
