//! 文本录入 - 业务能力层

use crate::error::AppResult;
use crate::infrastructure::{ElementHandle, UiSurface};

/// 负号需要单独输入的字段
pub const SIGNED_FIELD_LABEL: &str = "Target Refraction";

/// 把值拆成若干次输入事件
///
/// "Target Refraction" 的格式化逻辑会吞掉整体输入的负号，
/// 因此负值拆成 `-` 和剩余数字两次输入。
pub fn keystroke_batches<'a>(label: &str, value: &'a str) -> Vec<&'a str> {
    match value.strip_prefix('-') {
        Some(rest) if label == SIGNED_FIELD_LABEL => vec!["-", rest],
        _ => vec![value],
    }
}

/// 清空输入框（全选后删除）并录入新值
pub async fn enter_text(
    ui: &dyn UiSurface,
    input: &ElementHandle,
    label: &str,
    value: &str,
) -> AppResult<()> {
    ui.clear_input(input).await?;
    for batch in keystroke_batches(label, value) {
        if !batch.is_empty() {
            ui.type_text(input, batch).await?;
        }
    }
    Ok(())
}
