//! 单元测试辅助：临时目录与文件写入。

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// 带自动清理的临时目录（drop 时递归删除）。
pub struct TempDir(PathBuf);

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        Self::new_in(&std::env::temp_dir(), prefix)
    }

    /// 在指定目录下创建；`parent` 为相对路径时 `path()` 也保持相对。
    pub fn new_in(parent: &Path, prefix: &str) -> Self {
        let dir = parent.join(format!("membrane-deploy-{prefix}-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        Self(dir)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

pub fn write_file(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().expect("parent"))
        .unwrap_or_else(|e| panic!("create parent for {} failed: {e}", path.display()));
    std::fs::write(path, content).unwrap_or_else(|e| panic!("write {} failed: {e}", path.display()));
}
