//! 运行上下文
//!
//! 封装"这是哪一次运行、截图写到哪里"这一信息

use std::fmt::Display;
use std::path::PathBuf;

/// 运行上下文
///
/// 由请求层在调用引擎前生成，运行期间只读
#[derive(Debug, Clone)]
pub struct RunCtx {
    /// 运行 ID（请求层生成的 UUID）
    pub run_id: String,

    /// 结果截图的写入路径
    pub artifact_path: PathBuf,
}

impl RunCtx {
    /// 创建新的运行上下文
    pub fn new(run_id: impl Into<String>, artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            run_id: run_id.into(),
            artifact_path: artifact_path.into(),
        }
    }
}

impl Display for RunCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[运行 {}]", self.run_id)
    }
}
