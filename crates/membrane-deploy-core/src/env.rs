//! 环境配置读取（流水线第一阶段）。
//!
//! 约定：
//! - 必需变量：`platform` / `arch` / `shared_suffix`
//! - 变量缺失或为空字符串均视为缺失，直接返回 [`DeployError::MissingConfiguration`]
//! - 只读取，不修改进程环境
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use crate::error::DeployError;

/// 目标平台标识（例如 `macos` / `linux` / `windows`）。
pub const ENV_PLATFORM: &str = "platform";
/// 目标 CPU 架构（例如 `arm64` / `x86_64`）。
pub const ENV_ARCH: &str = "arch";
/// 动态库扩展名（例如 `dylib` / `so` / `dll`）。
pub const ENV_SHARED_SUFFIX: &str = "shared_suffix";

/// 启动时读取一次的环境配置（只读）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub platform: String,
    pub arch: String,
    pub shared_suffix: String,
}

impl EnvConfig {
    /// 从当前进程环境读取配置。
    ///
    /// 异常处理：
    /// - 任一必需变量缺失（或非 UTF-8、为空）时返回 `MissingConfiguration`。
    pub fn from_env() -> Result<Self, DeployError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过注入的查询函数读取配置（便于测试，无需修改进程全局环境）。
    ///
    /// 参数：
    /// - `lookup`：按变量名返回变量值
    ///
    /// 返回值：
    /// - 成功：三个变量都存在且非空
    /// - 失败：按 `platform` → `arch` → `shared_suffix` 顺序报告第一个缺失的变量名
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DeployError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(DeployError::MissingConfiguration(name))
        };
        Ok(Self {
            platform: require(ENV_PLATFORM)?,
            arch: require(ENV_ARCH)?,
            shared_suffix: require(ENV_SHARED_SUFFIX)?,
        })
    }
}
