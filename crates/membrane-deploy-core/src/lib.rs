//! membrane 原生库发布核心库。
//!
//! 功能：
//! - 读取发布所需的环境配置（平台、架构、动态库扩展名）
//! - 将平台/架构名规范化为包仓库使用的资源命名
//! - 将构建好的动态库复制到平台包的资源目录
//! - 解析发布版本号，并在包目录中依次执行同步/发布命令
//!
//! 作者：membrane 发布工具组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

pub mod env;
pub mod error;
pub mod manifest;
pub mod names;
pub mod paths;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod stage;
pub mod version;

#[cfg(test)]
mod testutil;

pub use error::DeployError;
