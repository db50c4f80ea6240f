use crate::models::request::CalculationRequest;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 JSON 或 TOML 文件加载计算请求（按扩展名区分，默认按 JSON 解析）
pub async fn load_request_file(path: &Path) -> Result<CalculationRequest> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取请求文件: {}", path.display()))?;

    let request = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => parse_toml_request(&content)
            .with_context(|| format!("无法解析TOML请求文件: {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("无法解析JSON请求文件: {}", path.display()))?,
    };

    tracing::info!("已加载请求文件: {}", path.display());
    Ok(request)
}

/// TOML 中的表先转成 JSON 值，再走与 HTTP 请求相同的反序列化路径
fn parse_toml_request(content: &str) -> Result<CalculationRequest> {
    let value: serde_json::Value = toml::from_str(content)?;
    Ok(serde_json::from_value(value)?)
}
