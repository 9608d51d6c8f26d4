//! 发布流水线错误类型。
//!
//! 约定：
//! - 所有错误均为致命错误：流水线不做本地恢复、重试或降级执行
//! - 错误消息直接面向操作人员（缺失的变量名、失败的命令与退出码等）
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 发布流水线错误。
///
/// 用途：
/// - 由核心库各阶段返回，二进制入口统一转为 `anyhow::Error` 输出并以非 0 状态退出。
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("缺少必需的环境变量: {0}")]
    MissingConfiguration(&'static str),

    #[error("不支持的 CPU 架构: {arch}（支持: {}）", crate::names::SUPPORTED_ARCHS.join(", "))]
    UnsupportedArchitecture { arch: String },

    #[error("复制构建产物失败: {} -> {}", .from.display(), .to.display())]
    ArtifactCopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("读取项目描述文件失败: {}", .path.display())]
    DescriptorUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("项目描述文件中未找到版本号: {}", .0.display())]
    VersionNotFound(PathBuf),

    #[error("包目录不存在: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("启动外部命令失败: {command}")]
    CommandLaunchFailed {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("外部命令退出码异常: {command} ({})", display_code(.code))]
    ExternalCommandFailed { command: String, code: Option<i32> },

    #[error("流水线不可重复执行（当前状态: {state}）")]
    PipelineAlreadyRun { state: String },

    #[error("读取发布清单失败: {}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("解析发布清单 JSON 失败: {}", .path.display())]
    ManifestInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 退出码展示：被信号终止的进程没有退出码。
fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("退出码 {c}"),
        None => "被信号终止".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configuration_names_the_key() {
        let err = DeployError::MissingConfiguration("arch");
        assert_eq!(err.to_string(), "缺少必需的环境变量: arch");
    }

    #[test]
    fn external_command_failure_reports_exit_code() {
        let err = DeployError::ExternalCommandFailed {
            command: "clojure -M:deploy".to_string(),
            code: Some(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("clojure -M:deploy"), "{msg}");
        assert!(msg.contains("退出码 2"), "{msg}");

        let killed = DeployError::ExternalCommandFailed {
            command: "clojure".to_string(),
            code: None,
        };
        assert!(killed.to_string().contains("被信号终止"));
    }

    #[test]
    fn unsupported_architecture_lists_supported_set() {
        let err = DeployError::UnsupportedArchitecture {
            arch: "riscv64".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("riscv64"), "{msg}");
        assert!(msg.contains("arm64, x86_64"), "{msg}");
    }
}
