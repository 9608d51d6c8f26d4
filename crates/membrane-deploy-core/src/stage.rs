//! 构建产物落位（流水线第三阶段）。
//!
//! 说明：
//! - 将构建输出的动态库复制到平台包的资源目录，并改为规范文件名
//! - 目标目录必须事先存在；本模块不创建目录
//! - 复制失败（源缺失/目录缺失/权限不足）直接返回错误，不重试
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use tracing::info;

use crate::error::DeployError;
use crate::paths::ArtifactPaths;

/// 复制构建产物到包内目标位置（覆盖已存在的目标文件）。
///
/// 返回值：
/// - 成功：复制的字节数
///
/// 异常处理：
/// - 任何 IO 错误都转为 `ArtifactCopyFailed`，携带源/目标路径与底层错误。
pub fn stage_artifact(paths: &ArtifactPaths) -> Result<u64, DeployError> {
    info!(
        "复制构建产物: {} -> {}",
        paths.source.display(),
        paths.destination.display()
    );
    std::fs::copy(&paths.source, &paths.destination).map_err(|source| {
        DeployError::ArtifactCopyFailed {
            from: paths.source.clone(),
            to: paths.destination.clone(),
            source,
        }
    })
}
