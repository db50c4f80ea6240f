//! 同意页与默认勾选处理 - 业务能力层

use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::Timings;
use crate::error::AppResult;
use crate::infrastructure::wait::{wait_for_actionable, wait_for_element};
use crate::infrastructure::{Locator, Scope, TextMatch, UiSurface};
use crate::workflow::StageOutcome;

/// 同意按钮文本
const CONSENT_BUTTON: &str = "I Agree";
/// 需要取消的默认勾选项在复选框组中的位置（从 1 开始）
const OPT_IN_CHECKBOX_POSITION: usize = 4;

/// 把页面从初始加载带到可配置状态
pub struct ConsentGate {
    timings: Timings,
}

impl ConsentGate {
    pub fn new(timings: &Timings) -> Self {
        Self {
            timings: timings.clone(),
        }
    }

    /// 关闭必选的同意页；失败即中止运行
    pub async fn dismiss(&self, ui: &dyn UiSurface) -> AppResult<()> {
        let button = wait_for_actionable(
            ui,
            Scope::Page,
            &Locator::Button(TextMatch::Exact(CONSENT_BUTTON.to_string())),
            self.timings.wait_timeout,
            self.timings.poll_interval,
        )
        .await?;
        ui.click(&button).await?;
        sleep(self.timings.consent_settle).await;
        info!("✅ 已接受使用条款");
        Ok(())
    }

    /// 取消第 4 个复选框的默认勾选（尽力而为）
    pub async fn clear_opt_in(&self, ui: &dyn UiSurface) -> StageOutcome {
        match self.try_clear_opt_in(ui).await {
            Ok(outcome) => outcome,
            Err(e) => StageOutcome::degraded(e),
        }
    }

    async fn try_clear_opt_in(&self, ui: &dyn UiSurface) -> AppResult<StageOutcome> {
        let checkbox = wait_for_element(
            ui,
            Scope::Page,
            &Locator::NthCheckbox(OPT_IN_CHECKBOX_POSITION),
            self.timings.field_timeout,
            self.timings.poll_interval,
        )
        .await?;

        if ui.is_checked(&checkbox).await? {
            ui.click(&checkbox).await?;
            info!("✅ 已取消第 {} 个复选框", OPT_IN_CHECKBOX_POSITION);
        } else {
            debug!("第 {} 个复选框未勾选，无需处理", OPT_IN_CHECKBOX_POSITION);
        }
        Ok(StageOutcome::Ok)
    }
}
