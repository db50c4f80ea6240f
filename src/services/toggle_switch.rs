//! 开关控件 - 业务能力层
//!
//! 开关是尽力而为的增强项：设置失败只记录降级，不中止运行。

use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::Timings;
use crate::error::{AppResult, AutomationError};
use crate::infrastructure::{Locator, Scope, UiSurface};
use crate::workflow::StageOutcome;

/// 开关设置能力
pub struct ToggleSwitch {
    timings: Timings,
}

impl ToggleSwitch {
    pub fn new(timings: &Timings) -> Self {
        Self {
            timings: timings.clone(),
        }
    }

    /// 把 label 对应的开关设为 `desired`
    ///
    /// 状态已一致时不做任何操作，重复调用最多产生一次切换。
    pub async fn set(
        &self,
        ui: &dyn UiSurface,
        scope: Scope<'_>,
        label: &str,
        desired: bool,
    ) -> StageOutcome {
        match self.try_set(ui, scope, label, desired).await {
            Ok(outcome) => outcome,
            Err(e) => StageOutcome::degraded(e),
        }
    }

    async fn try_set(
        &self,
        ui: &dyn UiSurface,
        scope: Scope<'_>,
        label: &str,
        desired: bool,
    ) -> AppResult<StageOutcome> {
        let control = ui
            .find(scope, &Locator::Switch(label.to_string()))
            .await?
            .ok_or_else(|| AutomationError::ElementNotFound(format!("switch '{}'", label)))?;

        if ui.is_checked(&control).await? == desired {
            debug!("开关 {} 已是 {}，跳过", label, desired);
            return Ok(StageOutcome::Ok);
        }

        // 控件可能在屏幕外，隐藏元素上的点击会被拒绝
        ui.scroll_into_view(&control).await?;
        ui.click(&control).await?;
        sleep(self.timings.switch_settle).await;

        if ui.is_checked(&control).await? != desired {
            return Ok(StageOutcome::degraded(format!(
                "switch '{}' did not change to {}",
                label, desired
            )));
        }

        info!("✅ 开关 {} = {}", label, desired);
        Ok(StageOutcome::Ok)
    }
}
