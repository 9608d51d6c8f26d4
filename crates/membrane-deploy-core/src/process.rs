//! 外部命令执行（同步/发布）。
//!
//! 实现策略：
//! - 通过 [`CommandRunner`] 抽象子进程执行，生产环境使用 [`SystemRunner`]，测试可替换为记录型实现
//! - 子进程工作目录通过 `current_dir` 传入，不修改本进程的当前目录
//! - 子进程 stdout/stderr 被捕获：失败时以 warn 级别输出，成功时以 debug 级别输出
//! - 执行前记录完整命令行（参数按 shell 规则转义），便于仅凭日志复现
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::DeployError;

/// 一次具体的外部命令调用（执行前构造，执行后丢弃）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// 视为成功的退出码；为空时只接受 0。
    pub success_exit_codes: Vec<i32>,
}

impl Invocation {
    /// 可复现的命令行文本：程序名与参数按 POSIX shell 规则转义后以空格连接。
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_success(&self, code: Option<i32>) -> bool {
        match code {
            Some(c) if self.success_exit_codes.is_empty() => c == 0,
            Some(c) => self.success_exit_codes.contains(&c),
            None => false,
        }
    }
}

/// 单个参数的 shell 转义：仅含安全字符时原样返回，否则用单引号包裹。
fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

/// 子进程退出结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// 退出码；被信号终止时为 `None`。
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// 子进程执行器。
///
/// 返回值约定：
/// - `Ok(output)`：进程已退出（正常退出或被信号终止）
/// - `Err(_)`：进程无法启动
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<CommandOutput>;
}

/// 基于 `std::process::Command` 的执行器（阻塞直到子进程退出，捕获输出）。
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<CommandOutput> {
        let out = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .output()?;
        Ok(CommandOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        })
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, invocation: &Invocation) -> io::Result<CommandOutput> {
        (**self).run(invocation)
    }
}

/// 执行一次调用并检查退出码。
///
/// 异常处理：
/// - 启动失败：`CommandLaunchFailed`
/// - 退出码不在成功列表中（或被信号终止）：先以 warn 输出子进程 stdout/stderr，再返回 `ExternalCommandFailed`
pub fn execute<R: CommandRunner + ?Sized>(
    runner: &mut R,
    invocation: &Invocation,
) -> Result<(), DeployError> {
    let command = invocation.command_line();
    info!("执行命令: {} (目录: {})", command, invocation.working_dir.display());
    let out = runner
        .run(invocation)
        .map_err(|source| DeployError::CommandLaunchFailed {
            command: command.clone(),
            source,
        })?;
    let code = out.code;
    if invocation.is_success(code) {
        debug!(?code, "命令已退出");
        if !out.stdout.trim().is_empty() {
            debug!(stdout = %out.stdout.trim_end(), "命令输出");
        }
        return Ok(());
    }
    if !out.stdout.trim().is_empty() {
        warn!("命令 stdout: {}", out.stdout.trim_end());
    }
    if !out.stderr.trim().is_empty() {
        warn!("命令 stderr: {}", out.stderr.trim_end());
    }
    Err(DeployError::ExternalCommandFailed { command, code })
}

/// 查找可执行文件（用于环境自检，不执行）。
///
/// 返回值：
/// - 含路径分隔符：按给定路径（相对 `base`）检查文件是否存在
/// - 裸命令名：在 `PATH` 中查找；Windows 下额外尝试 `.exe` / `.cmd` / `.bat`
pub fn locate_program(program: &str, base: &Path) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        let p = crate::paths::resolve_path(base, candidate);
        return p.is_file().then_some(p);
    }
    let path_var = std::env::var_os("PATH")?;
    let extensions: &[&str] = if cfg!(windows) {
        &["", "exe", "cmd", "bat"]
    } else {
        &[""]
    };
    std::env::split_paths(&path_var).find_map(|dir| {
        extensions.iter().find_map(|ext| {
            let mut p = dir.join(program);
            if !ext.is_empty() {
                p.set_extension(ext);
            }
            p.is_file().then_some(p)
        })
    })
}
