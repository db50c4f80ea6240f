//! 字段解析 - 业务能力层
//!
//! 把人类可读的 label 文本映射到当前与之绑定的输入框。
//! 调用方只依赖 [`FieldResolver`]，匹配策略可以替换。

use async_trait::async_trait;
use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::{ElementHandle, Locator, Scope, UiSurface};

/// 字段解析能力
#[async_trait]
pub trait FieldResolver: Send + Sync {
    /// 找到与 label 绑定的输入框；不存在时返回 `None`（非致命）
    async fn resolve(
        &self,
        ui: &dyn UiSurface,
        scope: Scope<'_>,
        label: &str,
    ) -> AppResult<Option<ElementHandle>>;

    /// 反向解析：输入框当前绑定的 label 文本
    async fn label_of(
        &self,
        ui: &dyn UiSurface,
        scope: Scope<'_>,
        input: &ElementHandle,
    ) -> AppResult<Option<String>>;
}

/// 基于 `label[for]` ↔ `input[id]` 绑定的解析器
///
/// 不依赖输入框的位置或结构顺序
#[derive(Debug, Default, Clone, Copy)]
pub struct LabelBindingResolver;

#[async_trait]
impl FieldResolver for LabelBindingResolver {
    async fn resolve(
        &self,
        ui: &dyn UiSurface,
        scope: Scope<'_>,
        label: &str,
    ) -> AppResult<Option<ElementHandle>> {
        let Some(label_el) = ui.find(scope, &Locator::Label(label.to_string())).await? else {
            return Ok(None);
        };
        let Some(input_id) = ui
            .attribute(&label_el, "for")
            .await?
            .filter(|id| !id.is_empty())
        else {
            debug!("label '{}' 没有 for 属性", label);
            return Ok(None);
        };
        ui.find(scope, &Locator::Id(input_id)).await
    }

    async fn label_of(
        &self,
        ui: &dyn UiSurface,
        scope: Scope<'_>,
        input: &ElementHandle,
    ) -> AppResult<Option<String>> {
        let Some(input_id) = ui
            .attribute(input, "id")
            .await?
            .filter(|id| !id.is_empty())
        else {
            return Ok(None);
        };
        match ui.find(scope, &Locator::LabelFor(input_id)).await? {
            Some(label_el) => Ok(Some(ui.text(&label_el).await?)),
            None => Ok(None),
        }
    }
}
