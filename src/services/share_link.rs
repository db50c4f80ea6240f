//! 分享链接提取 - 业务能力层
//!
//! 分享控件的标记结构不固定，按多种策略依次查找。
//! 找到后优先从控件内嵌的复制动作中直接解析链接；解析不出再点击控件，
//! 等待片刻后把当前地址当作分享链接。后者只是尽力而为，可能拿到的是
//! 应用的通用地址而不是本次计算的专属链接。

use regex::Regex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Timings;
use crate::error::AppResult;
use crate::infrastructure::{ElementHandle, Locator, Scope, ShareStrategy, UiSurface};

/// 可能携带复制动作的属性
const ACTION_ATTRIBUTES: [&str; 3] = ["onclick", "href", "data-clipboard-text"];

/// 从 `copyToClipboard('https://...')` 一类的调用中解析出链接
pub fn parse_clipboard_link(action: &str) -> Option<String> {
    let re = Regex::new(r#"(?:copyToClipboard|writeText|copy)\s*\(\s*['"](https?://[^'"]+)['"]"#)
        .ok()?;
    let caps = re.captures(action)?;
    Some(caps.get(1)?.as_str().to_string())
}

/// 分享链接提取能力
pub struct ShareLinkExtractor {
    timings: Timings,
}

impl ShareLinkExtractor {
    pub fn new(timings: &Timings) -> Self {
        Self {
            timings: timings.clone(),
        }
    }

    /// 提取分享链接；找不到控件或两种方式都失败时返回 `None`
    pub async fn extract(&self, ui: &dyn UiSurface) -> Option<String> {
        let control = self.locate(ui).await?;

        if let Some(link) = self.parse_embedded(ui, &control).await {
            info!("🔗 分享链接(解析): {}", link);
            return Some(link);
        }

        match self.click_and_read_url(ui, &control).await {
            Ok(link) => {
                info!("🔗 分享链接(当前地址): {}", link);
                Some(link)
            }
            Err(e) => {
                warn!("⚠️ 点击分享控件后读取地址失败: {}", e);
                None
            }
        }
    }

    async fn locate(&self, ui: &dyn UiSurface) -> Option<ElementHandle> {
        for strategy in ShareStrategy::ALL {
            match ui.find(Scope::Page, &Locator::ShareControl(strategy)).await {
                Ok(Some(control)) => {
                    debug!("分享控件命中策略 {:?}", strategy);
                    return Some(control);
                }
                Ok(None) => {}
                Err(e) => debug!("分享控件策略 {:?} 查找失败: {}", strategy, e),
            }
        }
        info!("未找到分享控件");
        None
    }

    async fn parse_embedded(&self, ui: &dyn UiSurface, control: &ElementHandle) -> Option<String> {
        for name in ACTION_ATTRIBUTES {
            let Ok(Some(value)) = ui.attribute(control, name).await else {
                continue;
            };
            if let Some(link) = parse_clipboard_link(&value) {
                return Some(link);
            }
            // data-clipboard-text 直接就是链接本身
            if name == "data-clipboard-text" && value.starts_with("http") {
                return Some(value);
            }
        }
        None
    }

    async fn click_and_read_url(&self, ui: &dyn UiSurface, control: &ElementHandle) -> AppResult<String> {
        ui.click(control).await?;
        sleep(self.timings.share_click_wait).await;
        ui.current_url().await
    }
}
