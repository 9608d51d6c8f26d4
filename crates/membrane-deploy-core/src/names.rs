//! 平台/架构名称规范化（流水线第二阶段）。
//!
//! 两张只读映射表：
//! - 平台：别名表 + 原样回退（未登记的平台名直接透传）
//! - 架构：别名表，无回退（未登记的架构直接报错）
//!
//! 架构名决定下游包仓库使用的资源目录名，必须精确匹配。
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use crate::error::DeployError;

/// 架构映射表支持的原始架构名。
pub const SUPPORTED_ARCHS: &[&str] = &["arm64", "x86_64"];

/// 规范化后的资源命名对（`resource_prefix`, `resource_suffix`）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalNames {
    /// 平台前缀，例如 `darwin`。
    pub resource_prefix: String,
    /// 架构后缀，例如 `aarch64`。
    pub resource_suffix: String,
}

/// 平台名规范化：`macos` → `darwin`，其余原样返回。
pub fn resolve_platform(platform: &str) -> &str {
    match platform {
        "macos" => "darwin",
        other => other,
    }
}

/// 架构名规范化。
///
/// 返回值：
/// - `arm64` → `aarch64`
/// - `x86_64` → `x86-64`
///
/// 异常处理：
/// - 其他取值返回 `UnsupportedArchitecture`。
pub fn resolve_arch(arch: &str) -> Result<&'static str, DeployError> {
    match arch {
        "arm64" => Ok("aarch64"),
        "x86_64" => Ok("x86-64"),
        other => Err(DeployError::UnsupportedArchitecture {
            arch: other.to_string(),
        }),
    }
}

/// 由原始平台/架构名计算规范化命名对。
pub fn resolve_names(platform: &str, arch: &str) -> Result<CanonicalNames, DeployError> {
    let resource_suffix = resolve_arch(arch)?;
    Ok(CanonicalNames {
        resource_prefix: resolve_platform(platform).to_string(),
        resource_suffix: resource_suffix.to_string(),
    })
}
