//! 发布前环境自检（只读，不复制文件、不执行外部命令）。
//!
//! 检查项：
//! - 构建产物、资源目录、包目录是否存在
//! - 版本号能否解析
//! - 同步/发布命令能否找到
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::PathBuf;

use crate::env::EnvConfig;
use crate::error::DeployError;
use crate::names::{resolve_names, CanonicalNames};
use crate::paths::ArtifactPaths;
use crate::pipeline::DeployOptions;
use crate::process::locate_program;

/// 自检结果。
#[derive(Debug)]
pub struct PreflightReport {
    pub names: CanonicalNames,
    pub paths: ArtifactPaths,
    pub source_exists: bool,
    pub destination_dir_exists: bool,
    pub package_dir_exists: bool,
    /// 版本解析结果（失败时保留错误，便于展示）。
    pub version: Result<String, DeployError>,
    pub sync_program: Option<PathBuf>,
    pub publish_program: Option<PathBuf>,
}

impl PreflightReport {
    /// 是否所有检查项都通过。
    pub fn ready(&self) -> bool {
        self.source_exists
            && self.destination_dir_exists
            && self.package_dir_exists
            && self.version.is_ok()
            && self.sync_program.is_some()
            && self.publish_program.is_some()
    }
}

/// 执行自检。
///
/// 异常处理：
/// - 仅当配置无法读取或架构不受支持时返回错误（此时无法推导路径）；
///   其余问题记录在报告中。
pub fn preflight(config: &EnvConfig, options: &DeployOptions) -> Result<PreflightReport, DeployError> {
    let names = resolve_names(&config.platform, &config.arch)?;
    let paths = ArtifactPaths::new(&options.work_dir, config, &names);
    let base = options.work_dir.as_path();
    Ok(PreflightReport {
        source_exists: paths.source.is_file(),
        destination_dir_exists: paths.destination_dir().is_dir(),
        package_dir_exists: paths.package_dir.is_dir(),
        version: options.version_source.resolve(),
        sync_program: locate_program(&options.manifest.sync.program, base),
        publish_program: locate_program(&options.manifest.publish.program, base),
        names,
        paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{CommandSpec, ReleaseManifest};
    use crate::testutil::{write_file, TempDir};
    use crate::version::VersionSource;

    fn linux_config() -> EnvConfig {
        EnvConfig {
            platform: "linux".to_string(),
            arch: "x86_64".to_string(),
            shared_suffix: "so".to_string(),
        }
    }

    #[test]
    fn reports_missing_pieces_without_side_effects() {
        let dir = TempDir::new("preflight-empty");
        let opts = DeployOptions {
            work_dir: dir.path().to_path_buf(),
            version_source: VersionSource::Descriptor(dir.path().join("project.clj")),
            manifest: ReleaseManifest::default(),
        };

        let report = preflight(&linux_config(), &opts).unwrap();
        assert!(!report.source_exists);
        assert!(!report.destination_dir_exists);
        assert!(!report.package_dir_exists);
        assert!(matches!(
            report.version,
            Err(DeployError::DescriptorUnreadable { .. })
        ));
        assert!(!report.ready());
        assert!(!dir.path().join("linux-x86-64").exists());
    }

    #[test]
    fn ready_when_everything_is_in_place() {
        let dir = TempDir::new("preflight-ready");
        write_file(&dir.path().join("libmembraneskia-x86_64.so"), "ELF");
        std::fs::create_dir_all(dir.path().join("linux-x86-64/resources/linux-x86-64")).unwrap();
        write_file(&dir.path().join("bin/tool"), "#!/bin/sh\n");

        let tool = CommandSpec {
            program: "bin/tool".to_string(),
            args: Vec::new(),
            success_exit_codes: Vec::new(),
        };
        let opts = DeployOptions {
            work_dir: dir.path().to_path_buf(),
            version_source: VersionSource::Literal("1.0".to_string()),
            manifest: ReleaseManifest {
                sync: tool.clone(),
                publish: tool,
            },
        };

        let report = preflight(&linux_config(), &opts).unwrap();
        assert_eq!(report.names.resource_suffix, "x86-64");
        assert!(report.source_exists);
        assert!(report.destination_dir_exists);
        assert!(report.package_dir_exists);
        assert_eq!(report.version.as_deref().ok(), Some("1.0"));
        assert_eq!(report.sync_program, Some(dir.path().join("bin/tool")));
        assert!(report.ready());
    }

    #[test]
    fn unsupported_arch_is_an_error() {
        let dir = TempDir::new("preflight-arch");
        let opts = DeployOptions {
            work_dir: dir.path().to_path_buf(),
            version_source: VersionSource::Literal("1.0".to_string()),
            manifest: ReleaseManifest::default(),
        };
        let cfg = EnvConfig {
            arch: "sparc".to_string(),
            ..linux_config()
        };
        assert!(preflight(&cfg, &opts).is_err());
    }
}
