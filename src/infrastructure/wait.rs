//! 有界等待 - 基础设施层
//!
//! 所有"等页面就绪"的地方都走 [`poll_until`]：按固定间隔探测，超时即返回
//! [`AutomationError::Timeout`]，从不无限等待。

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::MAX_WAIT;
use crate::error::{AppResult, AutomationError};
use crate::infrastructure::ui_surface::{ElementHandle, Locator, Scope, UiSurface};

/// 轮询直到探测函数返回 `Some` 或超时
///
/// 探测过程中的错误视为"尚未就绪"（元素可能正在重新渲染），
/// 超时时最后一次错误会附在超时信息里。
pub async fn poll_until<T, F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<Option<T>>>,
{
    let deadline = Instant::now() + timeout.min(MAX_WAIT);
    let mut last_error: Option<AutomationError> = None;

    loop {
        match probe().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => {
                debug!("等待 {} 时探测失败: {}", what, e);
                last_error = Some(e);
            }
        }

        let now = Instant::now();
        if now >= deadline {
            let what = match last_error {
                Some(e) => format!("{} (last error: {})", what, e),
                None => what.to_string(),
            };
            return Err(AutomationError::timeout(what, timeout));
        }

        sleep(interval.min(deadline - now)).await;
    }
}

/// 等待元素出现
pub async fn wait_for_element(
    ui: &dyn UiSurface,
    scope: Scope<'_>,
    locator: &Locator,
    timeout: Duration,
    interval: Duration,
) -> AppResult<ElementHandle> {
    poll_until(&format!("{:?}", locator), timeout, interval, || ui.find(scope, locator)).await
}

/// 等待元素出现且可操作
pub async fn wait_for_actionable(
    ui: &dyn UiSurface,
    scope: Scope<'_>,
    locator: &Locator,
    timeout: Duration,
    interval: Duration,
) -> AppResult<ElementHandle> {
    poll_until(
        &format!("{:?} to become actionable", locator),
        timeout,
        interval,
        || async move {
            match ui.find(scope, locator).await? {
                Some(element) if ui.is_actionable(&element).await? => Ok(Some(element)),
                _ => Ok(None),
            }
        },
    )
    .await
}

/// 等待元素消失
pub async fn wait_until_gone(
    ui: &dyn UiSurface,
    scope: Scope<'_>,
    locator: &Locator,
    timeout: Duration,
    interval: Duration,
) -> AppResult<()> {
    poll_until(
        &format!("{:?} to disappear", locator),
        timeout,
        interval,
        || async move {
            Ok(match ui.find(scope, locator).await? {
                Some(_) => None,
                None => Some(()),
            })
        },
    )
    .await
}
