//! 发布路径约定（构建产物、包目录、资源目录）。
//!
//! 目标：
//! - 所有路径都由调用目录 `work_dir` 显式拼接得到，不依赖进程当前工作目录
//! - 构建产物命名与包内资源命名集中在此处管理
//!
//! 布局（以 `macos` / `arm64` / `dylib` 为例）：
//! - 源文件：`libmembraneskia-arm64.dylib`
//! - 包目录：`macos-aarch64`
//! - 目标文件：`macos-aarch64/resources/darwin-aarch64/libmembraneskia.dylib`
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};

use crate::env::EnvConfig;
use crate::names::CanonicalNames;

/// 动态库文件名主干（不含架构后缀与扩展名）。
pub const LIBRARY_STEM: &str = "libmembraneskia";

/// 包目录下的资源根目录名。
pub const RESOURCES_DIR: &str = "resources";

/// 一次发布涉及的全部路径（派生值，无独立身份）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// 构建产物：`<work_dir>/libmembraneskia-<arch>.<suffix>`。
    pub source: PathBuf,
    /// 平台包目录：`<work_dir>/<platform>-<resource_suffix>`。
    pub package_dir: PathBuf,
    /// 包内目标文件：`<package_dir>/resources/<prefix>-<suffix>/libmembraneskia.<suffix>`。
    pub destination: PathBuf,
}

impl ArtifactPaths {
    /// 根据环境配置与规范化命名计算路径。
    ///
    /// 参数：
    /// - `work_dir`：调用目录（构建产物与包目录均相对于此目录）
    /// - `config`：原始平台/架构/扩展名
    /// - `names`：规范化命名对
    pub fn new(work_dir: &Path, config: &EnvConfig, names: &CanonicalNames) -> Self {
        let suffix = &config.shared_suffix;
        let source = work_dir.join(format!("{LIBRARY_STEM}-{}.{suffix}", config.arch));
        let package_dir = work_dir.join(package_dir_name(&config.platform, names));
        let destination = package_dir
            .join(RESOURCES_DIR)
            .join(format!("{}-{}", names.resource_prefix, names.resource_suffix))
            .join(format!("{LIBRARY_STEM}.{suffix}"));
        Self {
            source,
            package_dir,
            destination,
        }
    }

    /// 目标文件所在目录（必须事先存在，本工具不会创建）。
    pub fn destination_dir(&self) -> &Path {
        self.destination.parent().unwrap_or(&self.package_dir)
    }
}

/// 平台包目录名：原始平台名 + 规范化架构名，例如 `macos-aarch64`。
pub fn package_dir_name(platform: &str, names: &CanonicalNames) -> String {
    format!("{platform}-{}", names.resource_suffix)
}

/// 将命令行/清单中的路径解析为实际路径。
///
/// 参数：
/// - `base`：相对路径的基准目录（调用目录或清单所在目录）
/// - `raw`：原始路径
///
/// 返回值：
/// - `raw` 为绝对路径：直接返回
/// - `raw` 为相对路径：返回 `base.join(raw)`
pub fn resolve_path(base: &Path, raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        base.join(raw)
    }
}
