use super::Session;
use serde_json::json;
use worklog_core::TEMPLATE_VERSION;

/// Effective configuration as JSON, API key masked
fn render(session: &Session) -> anyhow::Result<String> {
    let config = &session.config;
    let endpoint = &config.endpoint;
    let value = json!({
        "home": session.paths.home.display().to_string(),
        "config_file": session.paths.config_file().display().to_string(),
        "store_path": session.store_path().display().to_string(),
        "report_dir": config.report_dir().display().to_string(),
        "language": config.language,
        "prompt_template_version": TEMPLATE_VERSION,
        "endpoint": {
            "endpoint_url": endpoint.endpoint_url,
            "model": endpoint.model,
            "api_key": endpoint.masked_api_key(),
            "max_tokens": endpoint.max_tokens,
            "temperature": endpoint.temperature,
            "timeout_secs": endpoint.timeout_secs,
        },
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn run(session: &Session) -> anyhow::Result<()> {
    println!("{}", render(session)?);
    Ok(())
}
