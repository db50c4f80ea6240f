use serde::Serialize;

/// 一次运行的最终结果
///
/// 运行开始时创建，各字段只由负责它的阶段写入，运行结束后不再修改。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutomationResult {
    pub success: bool,
    pub message: String,
    /// 结果截图是否已写入产物路径
    pub artifact_captured: bool,
    /// 计算结果的分享链接（尽力而为，可能只是应用首页地址）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
    /// 运行中发生的所有降级事件，按发生顺序排列
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AutomationResult {
    pub const SUCCESS_MESSAGE: &'static str = "Calculation completed successfully";

    /// 构造失败结果
    pub fn failed(message: impl Into<String>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            artifact_captured: false,
            share_link: None,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_share_link_is_not_serialized() {
        let result = AutomationResult {
            success: true,
            message: AutomationResult::SUCCESS_MESSAGE.to_string(),
            artifact_captured: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("share_link").is_none());
        assert!(json.get("warnings").is_none());
        assert_eq!(json["artifact_captured"], true);
    }
}
