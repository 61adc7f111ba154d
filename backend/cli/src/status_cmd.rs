//! `linehook status`: ask a running server for its health report.

use std::net::IpAddr;

use anyhow::Result;
use linehook_config::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let url = health_url(config);
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Ok(resp) => anyhow::bail!("linehook answered HTTP {} on {}", resp.status(), url),
        Err(_) => anyhow::bail!("linehook is not reachable at {}", url),
    }
}

/// Health endpoint of the local server. Wildcard binds are reached over loopback.
fn health_url(config: &AppConfig) -> String {
    let bind = config.server.bind_address.trim();
    let host = match bind.parse::<IpAddr>() {
        Ok(ip) if ip.is_unspecified() => "127.0.0.1".to_string(),
        Ok(IpAddr::V6(ip)) => format!("[{ip}]"),
        _ => bind.to_string(),
    };
    format!("http://{host}:{}/healthz", config.server.port)
}
