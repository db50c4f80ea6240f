//! 触发计算并等待结果 - 业务能力层

use tokio::time::sleep;
use tracing::info;

use crate::config::Timings;
use crate::error::AppResult;
use crate::infrastructure::wait::wait_for_actionable;
use crate::infrastructure::{Locator, Scope, TextMatch, UiSurface};
use crate::workflow::StageOutcome;

const CALCULATE_BUTTON: &str = "Calculate";
/// 结果渲染完成后才可用的按钮
const PRINT_BUTTON: &str = "Print";

/// 计算与结果同步能力
pub struct Calculator {
    timings: Timings,
}

impl Calculator {
    pub fn new(timings: &Timings) -> Self {
        Self {
            timings: timings.clone(),
        }
    }

    /// 触发计算；以脚本派发点击，绕过可能遮挡按钮的覆盖层
    pub async fn trigger(&self, ui: &dyn UiSurface) -> AppResult<()> {
        let button = wait_for_actionable(
            ui,
            Scope::Page,
            &Locator::Button(TextMatch::Contains(CALCULATE_BUTTON.to_string())),
            self.timings.wait_timeout,
            self.timings.poll_interval,
        )
        .await?;
        ui.dispatch_click(&button).await?;
        info!("✅ 已点击计算按钮");
        Ok(())
    }

    /// 等待打印按钮可用作为计算完成的信号
    ///
    /// 超时不致命：截图仍然有价值。无论结果如何都会再等待一段稳定时间。
    pub async fn await_results(&self, ui: &dyn UiSurface) -> StageOutcome {
        let outcome = match wait_for_actionable(
            ui,
            Scope::Page,
            &Locator::Button(TextMatch::Exact(PRINT_BUTTON.to_string())),
            self.timings.wait_timeout,
            self.timings.poll_interval,
        )
        .await
        {
            Ok(_) => {
                info!("✅ 计算结果已加载");
                StageOutcome::Ok
            }
            Err(e) => StageOutcome::degraded(format!("result not confirmed, continuing ({})", e)),
        };

        sleep(self.timings.result_settle).await;
        outcome
    }
}
