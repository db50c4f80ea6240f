//! 自定义下拉框 - 业务能力层
//!
//! 下拉框由普通容器拼成：触发器 + 挂载在 body 下的弹层列表，
//! 需要"悬停点击 → 等弹层 → 精确匹配选项 → 等弹层关闭"的多步协议。
//! 任何一步失败都是致命的：选不上的值会悄悄算出错误结果。

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Timings;
use crate::error::{AppResult, AutomationError};
use crate::infrastructure::wait::{wait_for_element, wait_until_gone};
use crate::infrastructure::{Locator, Scope, UiSurface};
use crate::models::Gender;

/// 性别下拉框的 label
const GENDER_LABEL: &str = "Gender";

/// 下拉框选择能力
pub struct PopoverSelect {
    timings: Timings,
}

impl PopoverSelect {
    pub fn new(timings: &Timings) -> Self {
        Self {
            timings: timings.clone(),
        }
    }

    /// 选择性别：优先找带 "Gender" label 的下拉框，否则使用页面上第一个下拉框
    pub async fn select_gender(&self, ui: &dyn UiSurface, gender: Gender) -> AppResult<()> {
        let labelled = ui
            .find(Scope::Page, &Locator::SelectTrigger(Some(GENDER_LABEL.to_string())))
            .await?
            .is_some();
        let label = labelled.then_some(GENDER_LABEL);
        self.select(ui, Scope::Page, label, gender.label()).await?;
        info!("✅ 性别: {}", gender.label());
        Ok(())
    }

    /// 在指定范围内按 label 找到下拉框并选中 `value`
    pub async fn select(
        &self,
        ui: &dyn UiSurface,
        scope: Scope<'_>,
        label: Option<&str>,
        value: &str,
    ) -> AppResult<()> {
        let name = label.unwrap_or("select");
        let fail = |reason: String| AutomationError::selection(name, value, reason);

        // 1. 找到触发器
        let trigger = wait_for_element(
            ui,
            scope,
            &Locator::SelectTrigger(label.map(str::to_string)),
            self.timings.wait_timeout,
            self.timings.poll_interval,
        )
        .await
        .map_err(|e| fail(format!("trigger not found ({})", e)))?;

        // 2. 悬停再点击，单纯点击打不开这类弹层
        ui.hover_click(&trigger)
            .await
            .map_err(|e| fail(format!("could not open dropdown ({})", e)))?;

        // 3. 等弹层出现
        let popover = wait_for_element(
            ui,
            Scope::Page,
            &Locator::OpenPopover,
            self.timings.wait_timeout,
            self.timings.poll_interval,
        )
        .await
        .map_err(|e| fail(format!("popover did not open ({})", e)))?;
        sleep(self.timings.popover_settle).await;

        // 4. 精确匹配选项
        let item = ui
            .find(Scope::Within(&popover), &Locator::ListItem(value.to_string()))
            .await
            .map_err(|e| fail(e.to_string()))?;
        let Some(item) = item else {
            let available = self.option_texts(ui, &popover).await;
            return Err(fail(format!(
                "option not present (available: [{}])",
                available.join(", ")
            )));
        };

        // 5. 选中并等待弹层关闭、依赖项重新渲染
        ui.click(&item)
            .await
            .map_err(|e| fail(format!("could not activate option ({})", e)))?;
        if let Err(e) = wait_until_gone(
            ui,
            Scope::Page,
            &Locator::OpenPopover,
            self.timings.selection_settle,
            self.timings.poll_interval,
        )
        .await
        {
            warn!("⚠️ {} 弹层未按时关闭: {}", name, e);
        }
        sleep(self.timings.selection_settle).await;

        info!("✅ {} = {}", name, value);
        Ok(())
    }

    async fn option_texts(
        &self,
        ui: &dyn UiSurface,
        popover: &crate::infrastructure::ElementHandle,
    ) -> Vec<String> {
        let items = match ui.find_all(Scope::Within(popover), &Locator::ListItems).await {
            Ok(items) => items,
            Err(e) => {
                debug!("读取选项列表失败: {}", e);
                return Vec::new();
            }
        };
        let mut texts = Vec::with_capacity(items.len());
        for item in &items {
            if let Ok(text) = ui.text(item).await {
                texts.push(text);
            }
        }
        texts
    }
}
