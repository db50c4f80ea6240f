//! 眼别区块配置 - 流程层
//!
//! 顺序固定：开关 → 文本字段 → 制造商 → 人工晶体型号。
//! 开关会改变渲染哪些字段，因此必须先于字段；型号列表依赖制造商，因此必须在其后。

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Timings;
use crate::error::AppResult;
use crate::infrastructure::wait::wait_for_element;
use crate::infrastructure::{ElementHandle, Locator, Scope, UiSurface};
use crate::models::request::{MANUFACTURER_KEY, SELECTED_DEVICE_KEY};
use crate::models::{EyeConfig, EyeSection};
use crate::services::{enter_text, FieldResolver, PopoverSelect, ToggleSwitch};
use crate::workflow::stage::{Degradations, StageOutcome};

/// 眼别区块配置器
///
/// - 不持有页面，只通过 [`UiSurface`] 操作
/// - 字段匹配交给 [`FieldResolver`]
pub struct EyeConfigurator {
    resolver: Arc<dyn FieldResolver>,
    switches: ToggleSwitch,
    popover: PopoverSelect,
    timings: Timings,
}

impl EyeConfigurator {
    pub fn new(resolver: Arc<dyn FieldResolver>, timings: &Timings) -> Self {
        Self {
            resolver,
            switches: ToggleSwitch::new(timings),
            popover: PopoverSelect::new(timings),
            timings: timings.clone(),
        }
    }

    /// 配置一个眼别区块
    ///
    /// 找不到区块或下拉框选择失败是致命错误；开关与字段问题记入 `degradations`。
    pub async fn configure_eye_section(
        &self,
        ui: &dyn UiSurface,
        section: EyeSection,
        config: &EyeConfig,
        degradations: &mut Degradations,
    ) -> AppResult<()> {
        info!("👁️ 配置 {} 区块...", section);

        // 1. 区块根节点
        let root = wait_for_element(
            ui,
            Scope::Page,
            &Locator::SectionByHeading(section.heading().to_string()),
            self.timings.wait_timeout,
            self.timings.poll_interval,
        )
        .await?;

        // 2. 开关（固定顺序）
        for (switch, on) in config.switches() {
            let outcome = self
                .switches
                .set(ui, Scope::Within(&root), switch.label(), on)
                .await;
            degradations.record(&format!("{} switch {}", section, switch.label()), outcome);
        }

        // 3. 文本字段
        if !config.fields().is_empty() {
            self.fill_fields(ui, section, &root, config, degradations).await?;
        }

        // 4. 制造商
        if let Some(manufacturer) = config.manufacturer() {
            self.popover
                .select(ui, Scope::Within(&root), Some(MANUFACTURER_KEY), manufacturer)
                .await?;
        }

        // 5. 型号（依赖制造商）
        if let Some(device) = config.selected_device() {
            self.popover
                .select(ui, Scope::Within(&root), Some(SELECTED_DEVICE_KEY), device)
                .await?;
        }

        info!("✅ {} 区块配置完成", section);
        Ok(())
    }

    /// 遍历区块内全部文本输入框，按绑定的 label 填写请求中的值
    async fn fill_fields(
        &self,
        ui: &dyn UiSurface,
        section: EyeSection,
        root: &ElementHandle,
        config: &EyeConfig,
        degradations: &mut Degradations,
    ) -> AppResult<()> {
        let fields = config.fields();
        let inputs = ui.find_all(Scope::Within(root), &Locator::TextInputs).await?;
        debug!("{} 区块共 {} 个输入框", section, inputs.len());

        let mut matched: BTreeSet<&str> = BTreeSet::new();
        for input in &inputs {
            let label = match self.resolver.label_of(ui, Scope::Within(root), input).await {
                Ok(Some(label)) => label,
                Ok(None) => continue,
                Err(e) => {
                    debug!("{} 读取输入框 label 失败: {}", section, e);
                    continue;
                }
            };
            let Some((key, value)) = fields.get_key_value(label.trim()) else {
                continue;
            };

            matched.insert(key.as_str());
            match enter_text(ui, input, key, value.as_str()).await {
                Ok(()) => debug!("{} {} = {}", section, key, value.as_str()),
                Err(e) => degradations.record(
                    &format!("{} field {}", section, key),
                    StageOutcome::degraded(format!("typing failed ({})", e)),
                ),
            }
        }

        for label in fields.keys().filter(|k| !matched.contains(k.as_str())) {
            degradations.record(
                &format!("{} field {}", section, label),
                StageOutcome::degraded("no input bound to this label"),
            );
        }
        Ok(())
    }
}
