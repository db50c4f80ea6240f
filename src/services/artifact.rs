//! 结果截图 - 业务能力层

use std::path::Path;

use tokio::fs;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Config;
use crate::config::Timings;
use crate::error::AppResult;
use crate::infrastructure::{UiSurface, Viewport};
use crate::workflow::StageOutcome;

/// 截图能力
pub struct ArtifactCapture {
    capture_viewport: Viewport,
    timings: Timings,
}

impl ArtifactCapture {
    pub fn new(config: &Config) -> Self {
        Self {
            capture_viewport: Viewport {
                width: config.capture_width,
                height: config.capture_height,
            },
            timings: config.timings.clone(),
        }
    }

    /// 把结果区域截图写入 `path`
    ///
    /// 截图前把视口放大到能容纳完整结果面板，结束后无论成败都恢复原视口。
    pub async fn capture(&self, ui: &dyn UiSurface, path: &Path) -> StageOutcome {
        let original = match ui.viewport().await {
            Ok(viewport) => Some(viewport),
            Err(e) => {
                warn!("⚠️ 读取原始视口失败: {}", e);
                None
            }
        };

        let captured = self.capture_resized(ui).await;

        if let Some(original) = original {
            if let Err(e) = ui.set_viewport(original).await {
                warn!("⚠️ 恢复视口失败: {}", e);
            }
        }

        let outcome = match captured {
            Ok(png) => write_artifact(path, &png).await.map(|_| png.len()),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(bytes) => {
                info!("📸 截图已保存: {} ({} 字节)", path.display(), bytes);
                StageOutcome::Ok
            }
            Err(e) => StageOutcome::degraded(format!("screenshot not captured ({})", e)),
        }
    }

    async fn capture_resized(&self, ui: &dyn UiSurface) -> AppResult<Vec<u8>> {
        ui.scroll_to_top().await?;
        ui.set_viewport(self.capture_viewport).await?;
        sleep(self.timings.capture_settle).await;
        ui.capture_png().await
    }
}

async fn write_artifact(path: &Path, png: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, png).await?;
    Ok(())
}
