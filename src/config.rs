use std::str::FromStr;
use std::time::Duration;

/// 单次等待或稳定延迟的上限
pub const MAX_WAIT: Duration = Duration::from_secs(3600);

/// 同时运行任务数的上限
pub const MAX_CONCURRENT_RUNS: usize = 1024;

/// 各阶段使用的等待与稳定延迟
#[derive(Clone, Debug)]
pub struct Timings {
    /// 同意页、下拉弹层、计算结果等元素的最长等待时间
    pub wait_timeout: Duration,
    /// 顶部患者信息字段 label 的最长等待时间
    pub field_timeout: Duration,
    /// 轮询间隔
    pub poll_interval: Duration,
    pub consent_settle: Duration,
    pub popover_settle: Duration,
    pub selection_settle: Duration,
    pub switch_settle: Duration,
    pub result_settle: Duration,
    pub capture_settle: Duration,
    pub share_click_wait: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(60),
            field_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(200),
            consent_settle: Duration::from_millis(1000),
            popover_settle: Duration::from_millis(500),
            selection_settle: Duration::from_millis(1000),
            switch_settle: Duration::from_millis(500),
            result_settle: Duration::from_millis(2000),
            capture_settle: Duration::from_millis(500),
            share_click_wait: Duration::from_millis(1000),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 计算器页面地址
    pub target_url: String,
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// 自定义浏览器可执行文件
    pub chrome_executable: Option<String>,
    /// 浏览器窗口大小
    pub window_width: u32,
    pub window_height: u32,
    /// 截图时使用的视口大小（需容纳完整结果面板）
    pub capture_width: u32,
    pub capture_height: u32,
    pub timings: Timings,
    /// 截图存放目录
    pub screenshots_dir: String,
    /// HTTP 服务监听地址
    pub bind_addr: String,
    /// 同时运行的自动化任务上限
    pub max_concurrent_runs: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: "https://iolcalculator.escrs.org/".to_string(),
            headless: true,
            chrome_executable: None,
            window_width: 1920,
            window_height: 1200,
            capture_width: 1920,
            capture_height: 2400,
            timings: Timings::default(),
            screenshots_dir: "screenshots".to_string(),
            bind_addr: "0.0.0.0:5000".to_string(),
            max_concurrent_runs: 4,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let t = default.timings;
        Self {
            target_url: std::env::var("TARGET_URL").unwrap_or(default.target_url),
            headless: env_parse("HEADLESS").unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            window_width: env_parse("WINDOW_WIDTH").unwrap_or(default.window_width),
            window_height: env_parse("WINDOW_HEIGHT").unwrap_or(default.window_height),
            capture_width: env_parse("CAPTURE_WIDTH").unwrap_or(default.capture_width),
            capture_height: env_parse("CAPTURE_HEIGHT").unwrap_or(default.capture_height),
            timings: Timings {
                wait_timeout: env_millis("WAIT_TIMEOUT_MS").unwrap_or(t.wait_timeout),
                field_timeout: env_millis("FIELD_TIMEOUT_MS").unwrap_or(t.field_timeout),
                poll_interval: env_millis("POLL_INTERVAL_MS").unwrap_or(t.poll_interval),
                consent_settle: env_millis("CONSENT_SETTLE_MS").unwrap_or(t.consent_settle),
                popover_settle: env_millis("POPOVER_SETTLE_MS").unwrap_or(t.popover_settle),
                selection_settle: env_millis("SELECTION_SETTLE_MS").unwrap_or(t.selection_settle),
                switch_settle: env_millis("SWITCH_SETTLE_MS").unwrap_or(t.switch_settle),
                result_settle: env_millis("RESULT_SETTLE_MS").unwrap_or(t.result_settle),
                capture_settle: env_millis("CAPTURE_SETTLE_MS").unwrap_or(t.capture_settle),
                share_click_wait: env_millis("SHARE_CLICK_WAIT_MS").unwrap_or(t.share_click_wait),
            },
            screenshots_dir: std::env::var("SCREENSHOTS_DIR").unwrap_or(default.screenshots_dir),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(default.bind_addr),
            max_concurrent_runs: env_parse::<usize>("MAX_CONCURRENT_RUNS")
                .filter(|n| *n > 0)
                .map(|n| n.min(MAX_CONCURRENT_RUNS))
                .unwrap_or(default.max_concurrent_runs),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_millis(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(|ms| Duration::from_millis(ms).min(MAX_WAIT))
}
