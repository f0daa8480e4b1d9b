//! 采样器 / 调度器名称
//!
//! 对应 ComfyUI/comfy/samplers.py 中的 KSampler.SAMPLERS / KSampler.SCHEDULERS

use log::warn;
use pyo3::{types::PyAnyMethods, Python};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::Error;

/// 采样器
///
/// 宿主不可用时使用的内置列表, 顺序与 ComfyUI 保持一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum Sampler {
    #[strum(to_string = "euler")]
    Euler,
    #[strum(to_string = "euler_cfg_pp")]
    EulerCfgPp,
    #[strum(to_string = "euler_ancestral")]
    EulerAncestral,
    #[strum(to_string = "euler_ancestral_cfg_pp")]
    EulerAncestralCfgPp,
    #[strum(to_string = "heun")]
    Heun,
    #[strum(to_string = "heunpp2")]
    Heunpp2,
    #[strum(to_string = "dpm_2")]
    Dpm2,
    #[strum(to_string = "dpm_2_ancestral")]
    Dpm2Ancestral,
    #[strum(to_string = "lms")]
    Lms,
    #[strum(to_string = "dpm_fast")]
    DpmFast,
    #[strum(to_string = "dpm_adaptive")]
    DpmAdaptive,
    #[strum(to_string = "dpmpp_2s_ancestral")]
    Dpmpp2sAncestral,
    #[strum(to_string = "dpmpp_2s_ancestral_cfg_pp")]
    Dpmpp2sAncestralCfgPp,
    #[strum(to_string = "dpmpp_sde")]
    DpmppSde,
    #[strum(to_string = "dpmpp_sde_gpu")]
    DpmppSdeGpu,
    #[strum(to_string = "dpmpp_2m")]
    Dpmpp2m,
    #[strum(to_string = "dpmpp_2m_cfg_pp")]
    Dpmpp2mCfgPp,
    #[strum(to_string = "dpmpp_2m_sde")]
    Dpmpp2mSde,
    #[strum(to_string = "dpmpp_2m_sde_gpu")]
    Dpmpp2mSdeGpu,
    #[strum(to_string = "dpmpp_3m_sde")]
    Dpmpp3mSde,
    #[strum(to_string = "dpmpp_3m_sde_gpu")]
    Dpmpp3mSdeGpu,
    #[strum(to_string = "ddpm")]
    Ddpm,
    #[strum(to_string = "lcm")]
    Lcm,
    #[strum(to_string = "ipndm")]
    Ipndm,
    #[strum(to_string = "ipndm_v")]
    IpndmV,
    #[strum(to_string = "deis")]
    Deis,
    #[strum(to_string = "res_multistep")]
    ResMultistep,
    #[strum(to_string = "res_multistep_cfg_pp")]
    ResMultistepCfgPp,
    #[strum(to_string = "res_multistep_ancestral")]
    ResMultistepAncestral,
    #[strum(to_string = "res_multistep_ancestral_cfg_pp")]
    ResMultistepAncestralCfgPp,
    #[strum(to_string = "gradient_estimation")]
    GradientEstimation,
    #[strum(to_string = "er_sde")]
    ErSde,
    #[strum(to_string = "seeds_2")]
    Seeds2,
    #[strum(to_string = "seeds_3")]
    Seeds3,
    #[strum(to_string = "ddim")]
    Ddim,
    #[strum(to_string = "uni_pc")]
    UniPc,
    #[strum(to_string = "uni_pc_bh2")]
    UniPcBh2,
}

/// 调度器
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum Scheduler {
    #[strum(to_string = "normal")]
    Normal,
    #[strum(to_string = "karras")]
    Karras,
    #[strum(to_string = "exponential")]
    Exponential,
    #[strum(to_string = "sgm_uniform")]
    SgmUniform,
    #[strum(to_string = "simple")]
    Simple,
    #[strum(to_string = "ddim_uniform")]
    DdimUniform,
    #[strum(to_string = "beta")]
    Beta,
    #[strum(to_string = "linear_quadratic")]
    LinearQuadratic,
    #[strum(to_string = "kl_optimal")]
    KlOptimal,
}

impl Sampler {
    /// 内置采样器名称列表
    pub fn names() -> Vec<String> {
        Self::iter().map(|v| v.to_string()).collect()
    }
}

impl Scheduler {
    /// 内置调度器名称列表
    pub fn names() -> Vec<String> {
        Self::iter().map(|v| v.to_string()).collect()
    }
}

/// 读取 comfy.samplers.KSampler 的类属性
fn ksampler_attr(py: Python<'_>, attr: &str) -> Result<Vec<String>, Error> {
    let names = py
        .import("comfy.samplers")?
        .getattr("KSampler")?
        .getattr(attr)?
        .extract::<Vec<String>>()?;
    Ok(names)
}

/// 获取采样器名称列表
///
/// 宿主模块不可用时回退到内置列表
pub fn sampler_names(py: Python<'_>) -> Vec<String> {
    ksampler_attr(py, "SAMPLERS").unwrap_or_else(|e| {
        warn!("comfy.samplers unavailable, using builtin sampler list, {e}");
        Sampler::names()
    })
}

/// 获取调度器名称列表
///
/// 宿主模块不可用时回退到内置列表
pub fn scheduler_names(py: Python<'_>) -> Vec<String> {
    ksampler_attr(py, "SCHEDULERS").unwrap_or_else(|e| {
        warn!("comfy.samplers unavailable, using builtin scheduler list, {e}");
        Scheduler::names()
    })
}
