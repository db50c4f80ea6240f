//! 截图存放目录
//!
//! 每次运行的截图以运行 ID 命名，不同运行之间不会互相覆盖。

use std::path::PathBuf;

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 创建存放目录（已存在时不做任何事）
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    pub fn path_for(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{}.png", id))
    }

    /// 读取截图；不存在时返回 `None`
    pub async fn read(&self, id: &Uuid) -> Option<Vec<u8>> {
        tokio::fs::read(self.path_for(id)).await.ok()
    }
}
