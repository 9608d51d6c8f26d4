//! 发布版本号解析。
//!
//! 两种策略（由命令行选择）：
//! - `Descriptor`：读取项目描述文件（如 `project.clj`），取第一个双引号包裹的字符串
//! - `Literal`：直接使用固定版本号
//!
//! 版本号按不透明文本处理，不做语义化版本校验。
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::DeployError;

/// 第一个双引号包裹的片段（允许跨行）。
static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]*)""#).unwrap());

/// 版本号来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    /// 从项目描述文件解析。
    Descriptor(PathBuf),
    /// 固定版本号。
    Literal(String),
}

impl VersionSource {
    /// 解析版本号。
    ///
    /// 异常处理：
    /// - 描述文件读取失败：`DescriptorUnreadable`
    /// - 描述文件中没有非空的引号片段：`VersionNotFound`
    pub fn resolve(&self) -> Result<String, DeployError> {
        match self {
            Self::Literal(version) => Ok(version.clone()),
            Self::Descriptor(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| {
                    DeployError::DescriptorUnreadable {
                        path: path.clone(),
                        source,
                    }
                })?;
                extract_quoted_version(&text)
                    .map(str::to_string)
                    .ok_or_else(|| DeployError::VersionNotFound(path.clone()))
            }
        }
    }
}

/// 提取文本中第一个双引号包裹的片段。
///
/// 返回值：
/// - 找到且非空：`Some(片段)`
/// - 没有引号片段，或第一个片段为空串 `""`：`None`
pub fn extract_quoted_version(text: &str) -> Option<&str> {
    QUOTED_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|v| !v.is_empty())
}
