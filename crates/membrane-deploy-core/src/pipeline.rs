//! 发布流水线编排（环境 → 命名 → 落位 → 版本 → 同步 → 发布）。
//!
//! 状态机：
//! - `Start → ConfigRead → NamesResolved → Staged → VersionResolved → MetadataSynced → Published → Done`
//! - 任一阶段出错进入 `Failed(原因)`，该状态为终态，不支持续跑
//!
//! 约束：
//! - 严格顺序执行、快速失败：前一阶段失败时后续阶段不会产生任何副作用
//! - 不修改进程当前目录；外部命令通过子进程工作目录在包目录中执行
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::env::EnvConfig;
use crate::error::DeployError;
use crate::manifest::ReleaseManifest;
use crate::names::{resolve_names, CanonicalNames};
use crate::paths::ArtifactPaths;
use crate::process::{execute, CommandRunner};
use crate::stage::stage_artifact;
use crate::version::VersionSource;

/// 流水线状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    ConfigRead,
    NamesResolved,
    Staged,
    VersionResolved,
    MetadataSynced,
    Published,
    Done,
    /// 终态，携带失败原因。
    Failed(String),
}

/// 流水线输入（来自命令行与清单）。
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// 调用目录：构建产物、包目录均相对于此目录。
    pub work_dir: PathBuf,
    pub version_source: VersionSource,
    pub manifest: ReleaseManifest,
}

impl DeployOptions {
    /// 默认的项目描述文件：调用目录的上一级 `project.clj`。
    pub fn default_descriptor(work_dir: &Path) -> PathBuf {
        work_dir.join("..").join("project.clj")
    }
}

/// 成功完成后的结果汇总。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub config: EnvConfig,
    pub names: CanonicalNames,
    pub paths: ArtifactPaths,
    pub version: String,
}

/// 一次发布流水线（单次使用）。
pub struct Pipeline<'a, R: CommandRunner> {
    options: &'a DeployOptions,
    runner: R,
    state: PipelineState,
}

impl<'a, R: CommandRunner> Pipeline<'a, R> {
    pub fn new(options: &'a DeployOptions, runner: R) -> Self {
        Self {
            options,
            runner,
            state: PipelineState::Start,
        }
    }

    /// 当前状态。
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// 执行完整流水线。
    ///
    /// 参数：
    /// - `lookup`：环境变量查询函数（生产环境传入 `std::env::var`）
    ///
    /// 返回值：
    /// - 成功：状态为 `Done`，返回 [`DeployReport`]
    /// - 失败：状态为 `Failed`，返回首个出错阶段的错误
    ///
    /// 异常处理：
    /// - 仅能在 `Start` 状态执行一次；`Done` / `Failed` 后再次调用直接返回
    ///   `PipelineAlreadyRun`，不执行任何阶段，状态保持不变
    pub fn run<F>(&mut self, lookup: F) -> Result<DeployReport, DeployError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.state != PipelineState::Start {
            warn!("流水线已执行过，拒绝再次执行，当前状态: {:?}", self.state);
            return Err(DeployError::PipelineAlreadyRun {
                state: format!("{:?}", self.state),
            });
        }
        match self.run_stages(lookup) {
            Ok(report) => Ok(report),
            Err(err) => {
                self.advance(PipelineState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    fn run_stages<F>(&mut self, lookup: F) -> Result<DeployReport, DeployError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = EnvConfig::from_lookup(lookup)?;
        self.advance(PipelineState::ConfigRead);

        let names = resolve_names(&config.platform, &config.arch)?;
        self.advance(PipelineState::NamesResolved);

        let paths = ArtifactPaths::new(&self.options.work_dir, &config, &names);
        stage_artifact(&paths)?;
        self.advance(PipelineState::Staged);

        let version = self.options.version_source.resolve()?;
        info!("使用版本: \"{}\"", version);
        self.advance(PipelineState::VersionResolved);

        ensure_package_dir(&paths.package_dir)?;

        let sync = self.options.manifest.sync.render(&paths.package_dir, &version);
        execute(&mut self.runner, &sync)?;
        self.advance(PipelineState::MetadataSynced);

        let publish = self
            .options
            .manifest
            .publish
            .render(&paths.package_dir, &version);
        execute(&mut self.runner, &publish)?;
        self.advance(PipelineState::Published);

        self.advance(PipelineState::Done);
        Ok(DeployReport {
            config,
            names,
            paths,
            version,
        })
    }

    fn advance(&mut self, next: PipelineState) {
        debug!("流水线状态: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// 检查包目录存在且为目录。
pub fn ensure_package_dir(dir: &Path) -> Result<(), DeployError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(DeployError::DirectoryNotFound(dir.to_path_buf()))
    }
}
