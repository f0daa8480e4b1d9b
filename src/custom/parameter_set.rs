//! 参数集
//!
//! 节点的全部输入字段, 按声明顺序原样输出

use serde::Serialize;

use crate::{
    error::Error,
    wrapper::comfy::{samplers::Sampler, samplers::Scheduler, HostChoices},
};

/// 字段名称, 即 RETURN_NAMES
pub const FIELD_NAMES: [&str; 10] = [
    "model_name",
    "prompt",
    "negative_prompt",
    "sampler",
    "scheduler",
    "steps",
    "cfg",
    "seed",
    "width",
    "height",
];

pub const DEFAULT_PROMPT: &str = "masterpiece, best quality, 1girl";
pub const DEFAULT_NEGATIVE_PROMPT: &str = "";

/// 整数控件范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntRange {
    pub default: i64,
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

/// 浮点控件范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const STEPS: IntRange = IntRange {
    default: 25,
    min: 1,
    max: 150,
    step: 1,
};

pub const CFG: FloatRange = FloatRange {
    default: 5.0,
    min: 0.0,
    max: 20.0,
    step: 0.1,
};

/// -1 交由下游节点随机
pub const SEED: IntRange = IntRange {
    default: -1,
    min: -1,
    max: 2147483647,
    step: 1,
};

pub const WIDTH: IntRange = IntRange {
    default: 1024,
    min: 64,
    max: 2048,
    step: 64,
};

pub const HEIGHT: IntRange = IntRange {
    default: 1536,
    min: 64,
    max: 2048,
    step: 64,
};

/// 输出元组, 顺序与 FIELD_NAMES 一致
pub type ParameterTuple = (
    String,
    String,
    String,
    String,
    String,
    i64,
    f64,
    i64,
    i64,
    i64,
);

/// 参数集
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    pub model_name: String,
    pub prompt: String,
    pub negative_prompt: String,
    pub sampler: String,
    pub scheduler: String,
    pub steps: i64,
    pub cfg: f64,
    pub seed: i64,
    pub width: i64,
    pub height: i64,
}

/// 可选输入, 未提供时使用声明的默认值
#[derive(Debug, Clone, Default)]
pub struct OptionalInputs {
    pub sampler: Option<String>,
    pub scheduler: Option<String>,
    pub steps: Option<i64>,
    pub cfg: Option<f64>,
    pub seed: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl ParameterSet {
    /// 由必需输入和可选输入构建参数集
    ///
    /// 采样器/调度器缺省时取宿主列表的第一项, 与前端下拉框的默认值一致
    pub fn resolve(
        model_name: String,
        prompt: String,
        negative_prompt: String,
        optional: OptionalInputs,
        choices: &impl HostChoices,
    ) -> Self {
        let sampler = optional.sampler.unwrap_or_else(|| {
            choices
                .samplers()
                .into_iter()
                .next()
                .unwrap_or_else(|| Sampler::Euler.to_string())
        });
        let scheduler = optional.scheduler.unwrap_or_else(|| {
            choices
                .schedulers()
                .into_iter()
                .next()
                .unwrap_or_else(|| Scheduler::Normal.to_string())
        });

        Self {
            model_name,
            prompt,
            negative_prompt,
            sampler,
            scheduler,
            steps: optional.steps.unwrap_or(STEPS.default),
            cfg: optional.cfg.unwrap_or(CFG.default),
            seed: optional.seed.unwrap_or(SEED.default),
            width: optional.width.unwrap_or(WIDTH.default),
            height: optional.height.unwrap_or(HEIGHT.default),
        }
    }

    /// 转换为输出元组
    pub fn into_tuple(self) -> ParameterTuple {
        (
            self.model_name,
            self.prompt,
            self.negative_prompt,
            self.sampler,
            self.scheduler,
            self.steps,
            self.cfg,
            self.seed,
            self.width,
            self.height,
        )
    }

    /// 变更指纹
    ///
    /// 全部字段按声明顺序以 `-` 连接, 字符串字段使用 JSON 字符串字面量,
    /// 保证字段边界不会混淆
    pub fn fingerprint(&self) -> Result<String, Error> {
        Ok(format!(
            "{}-{}-{}-{}-{}-{}-{:?}-{}-{}-{}",
            serde_json::to_string(&self.model_name)?,
            serde_json::to_string(&self.prompt)?,
            serde_json::to_string(&self.negative_prompt)?,
            serde_json::to_string(&self.sampler)?,
            serde_json::to_string(&self.scheduler)?,
            self.steps,
            self.cfg,
            self.seed,
            self.width,
            self.height,
        ))
    }
}

impl From<ParameterTuple> for ParameterSet {
    fn from(value: ParameterTuple) -> Self {
        let (
            model_name,
            prompt,
            negative_prompt,
            sampler,
            scheduler,
            steps,
            cfg,
            seed,
            width,
            height,
        ) = value;
        Self {
            model_name,
            prompt,
            negative_prompt,
            sampler,
            scheduler,
            steps,
            cfg,
            seed,
            width,
            height,
        }
    }
}
