use std::time::Duration;

use thiserror::Error;

/// 自动化引擎错误类型
///
/// 该枚举只表示"致命"一层：凡是以 `Err` 形式返回的错误都会中止当前运行。
/// 可降级的问题由各阶段自行转换为 [`crate::workflow::StageOutcome::Degraded`]。
#[derive(Debug, Error)]
pub enum AutomationError {
    /// 浏览器启动失败
    #[error("failed to launch browser session: {0}")]
    Launch(String),

    /// 导航失败
    #[error("failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// 有界等待超时
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    /// 元素不存在
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// 下拉框选择失败
    #[error("could not select '{value}' in dropdown '{label}': {reason}")]
    Selection {
        label: String,
        value: String,
        reason: String,
    },

    /// CDP 调用失败
    #[error("browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// 页面脚本执行结果异常
    #[error("page script failed: {0}")]
    Script(String),

    /// JSON 解析失败
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// 文件操作失败
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 请求内容不合法
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 运行边界捕获到的意外故障
    #[error("unexpected fault: {0}")]
    Unexpected(String),
}

impl AutomationError {
    /// 创建超时错误
    pub fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        AutomationError::Timeout {
            what: what.into(),
            timeout,
        }
    }

    /// 创建下拉框选择错误
    pub fn selection(
        label: impl Into<String>,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        AutomationError::Selection {
            label: label.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// 是否为超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, AutomationError::Timeout { .. })
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AutomationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_error_names_label_and_value() {
        let err = AutomationError::selection("Select IOL", "SN60WF", "option not present");
        let msg = err.to_string();
        assert!(msg.contains("Select IOL"));
        assert!(msg.contains("SN60WF"));
        assert!(msg.contains("option not present"));
    }

    #[test]
    fn timeout_is_classified() {
        let err = AutomationError::timeout("popover", Duration::from_secs(3));
        assert!(err.is_timeout());
        assert!(!AutomationError::ElementNotFound("x".into()).is_timeout());
    }
}
