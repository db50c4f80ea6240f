use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iol_calculator_submit::api;
use iol_calculator_submit::models::load_request_file;
use iol_calculator_submit::utils::logging;
use iol_calculator_submit::{ChromeLauncher, Config, RunCtx, SessionDriver};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "iol-calculator-submit", version, about = "ESCRS IOL 计算器自动化服务")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 启动 HTTP 服务（默认）
    Serve {
        /// 监听地址，覆盖 BIND_ADDR
        #[arg(long, env = "BIND_ADDR")]
        bind: Option<String>,
    },
    /// 在本地执行一次计算
    Run {
        /// 请求文件（.json 或 .toml）
        #[arg(long)]
        request: PathBuf,
        /// 截图输出路径
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            logging::log_startup(&config);
            let engine = Arc::new(SessionDriver::new(ChromeLauncher::new(&config), &config));
            api::serve(&config, engine).await
        }
        Command::Run { request, output } => {
            let request = load_request_file(&request).await?;
            let run_id = Uuid::new_v4().to_string();
            let output = output.unwrap_or_else(|| {
                PathBuf::from(&config.screenshots_dir).join(format!("{}.png", run_id))
            });

            let driver = SessionDriver::new(ChromeLauncher::new(&config), &config);
            let result = driver
                .run_automation(&request, &RunCtx::new(run_id, output))
                .await;

            let json = serde_json::to_string_pretty(&result).context("序列化运行结果失败")?;
            println!("{}", json);

            if !result.success {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
