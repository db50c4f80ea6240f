use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppResult, AutomationError};

/// 启动一个使用独立用户目录的浏览器，并打开一个空白页面
///
/// 返回浏览器、事件处理任务和页面；调用方负责关闭浏览器并结束事件任务。
pub async fn launch_isolated_browser(
    config: &Config,
    profile_dir: &Path,
) -> AppResult<(Browser, JoinHandle<()>, Page)> {
    info!("🚀 启动浏览器 (headless = {})...", config.headless);
    debug!("用户目录: {}", profile_dir.display());

    let mut builder = BrowserConfig::builder();
    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    builder = builder
        // 不带 --enable-automation
        .disable_default_args()
        .user_data_dir(profile_dir)
        .window_size(config.window_width, config.window_height)
        .viewport(None)
        .args(vec![
            "--no-sandbox".to_string(),
            "--disable-gpu".to_string(),
            "--disable-dev-shm-usage".to_string(),
            format!("--window-size={},{}", config.window_width, config.window_height),
            "--disable-blink-features=AutomationControlled".to_string(),
        ]);

    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(Path::new(path));
    }

    let browser_config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        AutomationError::Launch(format!("invalid browser config: {}", e))
    })?;

    let (mut browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AutomationError::Launch(e.to_string())
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    let page = match browser.new_page("about:blank").await {
        Ok(page) => page,
        Err(e) => {
            error!("创建页面失败: {}", e);
            let _ = browser.close().await;
            let _ = browser.wait().await;
            handler_task.abort();
            return Err(AutomationError::Launch(format!("could not open page: {}", e)));
        }
    };

    Ok((browser, handler_task, page))
}
