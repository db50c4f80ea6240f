//! Chrome 会话
//!
//! 每次运行一个浏览器进程、一个临时用户目录，运行结束后全部删除。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Browser;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser::headless::launch_isolated_browser;
use crate::config::Config;
use crate::error::{AppResult, AutomationError};
use crate::infrastructure::{AutomationSession, JsExecutor, SessionLauncher, UiSurface};
use crate::workflow::RunCtx;

/// 在每个新文档加载前隐藏自动化标记
const HIDE_WEBDRIVER_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// 为每次运行启动独立 Chrome 的会话工厂
#[derive(Clone)]
pub struct ChromeLauncher {
    config: Config,
}

impl ChromeLauncher {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn launch(&self, ctx: &RunCtx) -> AppResult<Box<dyn AutomationSession>> {
        let profile_dir = std::env::temp_dir().join(format!("iol-calculator-{}", ctx.run_id));
        tokio::fs::create_dir_all(&profile_dir).await?;

        let (mut browser, handler, page) =
            match launch_isolated_browser(&self.config, &profile_dir).await {
                Ok(parts) => parts,
                Err(e) => {
                    remove_profile(&profile_dir).await;
                    return Err(e);
                }
            };

        if let Err(e) = page
            .execute(AddScriptToEvaluateOnNewDocumentParams::new(HIDE_WEBDRIVER_SCRIPT))
            .await
        {
            let _ = browser.close().await;
            let _ = browser.wait().await;
            handler.abort();
            remove_profile(&profile_dir).await;
            return Err(AutomationError::Launch(format!(
                "could not install page script: {}",
                e
            )));
        }

        info!("{} ✅ 浏览器会话已就绪", ctx);
        Ok(Box::new(ChromeSession {
            executor: JsExecutor::new(page),
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handler)),
            profile_dir,
        }))
    }
}

/// 一次运行独占的 Chrome 会话
pub struct ChromeSession {
    executor: JsExecutor,
    browser: Mutex<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    profile_dir: PathBuf,
}

#[async_trait]
impl AutomationSession for ChromeSession {
    fn surface(&self) -> &dyn UiSurface {
        &self.executor
    }

    async fn close(&self) -> AppResult<()> {
        let mut result = Ok(());

        if let Some(mut browser) = self.browser.lock().await.take() {
            if let Err(e) = browser.close().await {
                result = Err(AutomationError::from(e));
            }
            if let Err(e) = browser.wait().await {
                warn!("⚠️ 等待浏览器进程退出失败: {}", e);
            }
        }
        if let Some(handler) = self.handler.lock().await.take() {
            handler.abort();
        }
        remove_profile(&self.profile_dir).await;

        debug!("浏览器会话已关闭");
        result
    }
}

async fn remove_profile(profile_dir: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(profile_dir).await {
        debug!("删除用户目录 {} 失败: {}", profile_dir.display(), e);
    }
}
