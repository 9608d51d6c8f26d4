//! 发布清单（release-manifest.json）：外部同步/发布命令定义。
//!
//! 该模块描述发布阶段需要执行的两条外部命令：
//! - `sync`：把版本号写入包描述（默认 `clojure -X:jar :sync-pom true :version "\"<版本>\""`）
//! - `publish`：发布到包仓库（默认 `clojure -M:deploy`）
//!
//! 约定：
//! - 清单文件可选；缺省或字段缺失时使用上述默认命令
//! - 参数中的 `{version}` 占位符在执行前替换为解析出的版本号
//! - 含路径分隔符的相对 `program` 以清单所在目录为基准解析；裸命令名交给 PATH 查找
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DeployError;
use crate::paths;
use crate::process::Invocation;

/// 参数中的版本号占位符。
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// 清单根对象。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseManifest {
    #[serde(default = "default_sync")]
    /// 同步包元数据（写入版本号）的命令。
    pub sync: CommandSpec,
    #[serde(default = "default_publish")]
    /// 发布命令。
    pub publish: CommandSpec,
}

impl Default for ReleaseManifest {
    fn default() -> Self {
        Self {
            sync: default_sync(),
            publish: default_publish(),
        }
    }
}

/// 单条外部命令定义。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// 可执行文件（命令名或路径）。
    pub program: String,
    #[serde(default)]
    /// 参数列表（可包含 `{version}` 占位符）。
    pub args: Vec<String>,
    #[serde(default)]
    /// 视为成功的退出码；为空时只接受 0。
    pub success_exit_codes: Vec<i32>,
}

fn default_sync() -> CommandSpec {
    CommandSpec {
        program: "clojure".to_string(),
        args: vec![
            "-X:jar".to_string(),
            ":sync-pom".to_string(),
            "true".to_string(),
            ":version".to_string(),
            // EDN 字符串：版本号本身需要带引号
            format!("\"{VERSION_PLACEHOLDER}\""),
        ],
        success_exit_codes: Vec::new(),
    }
}

fn default_publish() -> CommandSpec {
    CommandSpec {
        program: "clojure".to_string(),
        args: vec!["-M:deploy".to_string()],
        success_exit_codes: Vec::new(),
    }
}

impl ReleaseManifest {
    /// 读取并解析清单文件。
    ///
    /// 参数：
    /// - `path`：清单文件路径
    ///
    /// 返回值：
    /// - 含路径分隔符的相对 `program` 已改写为绝对路径（基准为清单所在目录），
    ///   与子进程工作目录无关
    ///
    /// 异常处理：
    /// - 文件读取失败：`ManifestUnreadable`
    /// - JSON 解析失败：`ManifestInvalid`
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        let bytes = std::fs::read(path).map_err(|source| DeployError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest: ReleaseManifest =
            serde_json::from_slice(&bytes).map_err(|source| DeployError::ManifestInvalid {
                path: path.to_path_buf(),
                source,
            })?;
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let base = std::path::absolute(parent).map_err(|source| DeployError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.sync.anchor_program(&base);
        manifest.publish.anchor_program(&base);
        Ok(manifest)
    }
}

impl CommandSpec {
    /// 生成一次具体调用：替换版本占位符并指定子进程工作目录。
    pub fn render(&self, working_dir: &Path, version: &str) -> Invocation {
        Invocation {
            program: self.program.clone(),
            args: self
                .args
                .iter()
                .map(|arg| arg.replace(VERSION_PLACEHOLDER, version))
                .collect(),
            working_dir: working_dir.to_path_buf(),
            success_exit_codes: self.success_exit_codes.clone(),
        }
    }

    /// 将含路径分隔符的相对 `program` 固定到清单目录下。
    fn anchor_program(&mut self, base: &Path) {
        let program = Path::new(&self.program);
        if program.is_relative() && program.components().count() > 1 {
            let anchored: PathBuf = paths::resolve_path(base, program);
            self.program = anchored.to_string_lossy().to_string();
        }
    }
}
