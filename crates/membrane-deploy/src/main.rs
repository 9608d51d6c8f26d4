//! membrane 原生库发布工具（命令行入口）。
//!
//! 职责：
//! - 从环境变量读取平台/架构/动态库扩展名
//! - 将构建好的 `libmembraneskia` 复制到平台包的资源目录
//! - 解析版本号后，在平台包目录中依次执行元数据同步与发布命令
//!
//! 环境变量：
//! - `platform` / `arch` / `shared_suffix`：必需
//! - `RUST_LOG`：日志过滤（默认 `info`）
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use membrane_deploy_core::env::EnvConfig;
use membrane_deploy_core::manifest::ReleaseManifest;
use membrane_deploy_core::names::resolve_names;
use membrane_deploy_core::paths::{self, ArtifactPaths};
use membrane_deploy_core::pipeline::{DeployOptions, Pipeline};
use membrane_deploy_core::preflight::preflight;
use membrane_deploy_core::process::SystemRunner;
use membrane_deploy_core::version::VersionSource;
use tracing::info;

/// 命令行参数。
///
/// 说明：
/// - `work_dir` 为调用目录，构建产物与平台包目录都相对于它
/// - `release_version` 与 `descriptor` 二选一；都未指定时读取 `<work_dir>/../project.clj`
#[derive(Debug, Parser)]
#[command(name = "membrane-deploy", version)]
struct Cli {
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// 发布清单（覆盖默认的 clojure 同步/发布命令）。
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// 固定版本号。
    #[arg(long, conflicts_with = "descriptor")]
    release_version: Option<String>,

    /// 项目描述文件（取第一个双引号字符串作为版本号）。
    #[arg(long)]
    descriptor: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 执行完整发布流程（复制产物 → 同步版本 → 发布）。
    Deploy,
    /// 仅解析并输出命名与路径（不做任何修改）。
    Resolve,
    /// 发布前自检（不复制文件、不执行外部命令）。
    Doctor,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Deploy => deploy(&cli),
        Commands::Resolve => resolve(&cli),
        Commands::Doctor => doctor(&cli),
    }
}

/// 由命令行参数组装流水线输入。
///
/// 异常处理：
/// - 指定了清单但读取/解析失败时返回错误
fn load_options(cli: &Cli) -> Result<DeployOptions> {
    let work_dir = cli.work_dir.clone();
    let version_source = match (&cli.release_version, &cli.descriptor) {
        (Some(version), _) => VersionSource::Literal(version.clone()),
        (None, Some(descriptor)) => {
            VersionSource::Descriptor(paths::resolve_path(&work_dir, descriptor))
        }
        (None, None) => VersionSource::Descriptor(DeployOptions::default_descriptor(&work_dir)),
    };
    let manifest = match &cli.manifest {
        Some(path) => ReleaseManifest::load(path)?,
        None => ReleaseManifest::default(),
    };
    Ok(DeployOptions {
        work_dir,
        version_source,
        manifest,
    })
}

/// 执行完整发布流程。
///
/// 异常处理：
/// - 任一阶段失败立即终止并返回错误；进程以非 0 状态退出
fn deploy(cli: &Cli) -> Result<()> {
    let options = load_options(cli)?;
    let mut pipeline = Pipeline::new(&options, SystemRunner);
    let report = pipeline
        .run(|name| std::env::var(name).ok())
        .context("发布失败")?;
    info!(
        "发布完成: {} {} ({})",
        report.paths.package_dir.display(),
        report.version,
        report.paths.destination.display()
    );
    Ok(())
}

/// 输出规范化命名与派生路径。
fn resolve(cli: &Cli) -> Result<()> {
    let config = EnvConfig::from_env()?;
    let names = resolve_names(&config.platform, &config.arch)?;
    let paths = ArtifactPaths::new(&cli.work_dir, &config, &names);
    println!("platform = {}", config.platform);
    println!("arch = {}", config.arch);
    println!("resource_prefix = {}", names.resource_prefix);
    println!("resource_suffix = {}", names.resource_suffix);
    println!("source = {}", paths.source.display());
    println!("destination = {}", paths.destination.display());
    println!("package_dir = {}", paths.package_dir.display());
    Ok(())
}

/// 发布前自检（用于排障）。
///
/// 输出：
/// - 构建产物/资源目录/包目录是否存在
/// - 版本号解析结果
/// - 同步/发布命令是否可找到
fn doctor(cli: &Cli) -> Result<()> {
    let config = EnvConfig::from_env()?;
    let options = load_options(cli)?;
    let report = preflight(&config, &options)?;
    println!("source_exists = {}", report.source_exists);
    println!("destination_dir_exists = {}", report.destination_dir_exists);
    println!("package_dir_exists = {}", report.package_dir_exists);
    match &report.version {
        Ok(version) => println!("version = {version}"),
        Err(err) => println!("version_error = {err}"),
    }
    println!(
        "sync_program = {} ({})",
        options.manifest.sync.program,
        found(report.sync_program.as_deref())
    );
    println!(
        "publish_program = {} ({})",
        options.manifest.publish.program,
        found(report.publish_program.as_deref())
    );
    println!("ready = {}", report.ready());
    Ok(())
}

fn found(location: Option<&Path>) -> String {
    match location {
        Some(p) => p.display().to_string(),
        None => "missing".to_string(),
    }
}
