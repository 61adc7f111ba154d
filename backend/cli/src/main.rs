mod bootstrap;
mod status_cmd;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use linehook_channels::{ChannelAdapter, LineAdapter};
use linehook_config::{redact, AppConfig, EnvVars, KmsKeyConfig, LoggingConfig};
use linehook_core::{Credentials, KeyIdentifier};
use linehook_logging::init_logger;

#[derive(Parser)]
#[command(name = "linehook")]
#[command(about = "linehook — LINE webhook bot with KMS-sealed credentials")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt credentials and start the webhook server (default)
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Decrypt credentials and report whether they are usable
    CheckSecrets,
    /// Print the KMS key resource name built from the environment
    KeyName,
    /// Query a running server's health endpoint
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match linehook_config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            let _guard = init_logger(&LoggingConfig::default());
            error!(error = %e, "Invalid configuration");
            return Err(e).context("Failed to load configuration");
        }
    };
    let _guard = init_logger(&config.logging);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await
        }
        Commands::CheckSecrets => check_secrets(config).await,
        Commands::KeyName => {
            let key = KmsKeyConfig::from_env(&EnvVars::from_process())?.key_identifier();
            println!("{key}");
            Ok(())
        }
        Commands::Status => status_cmd::run(&config).await,
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    info!(config = %redact(&serde_json::to_value(&config)?), "Starting linehook");

    // Nothing is served unless bootstrap succeeds.
    let credentials = match bootstrap::credentials(&config).await {
        Ok(credentials) => Arc::new(credentials),
        Err(e) => {
            error!(error = %e, "Credential bootstrap failed; refusing to serve");
            return Err(e).context("Credential bootstrap failed");
        }
    };

    let line = LineAdapter::from_credentials(credentials, &config.line, &config.server.webhook_path)?;
    let adapters: Vec<Arc<dyn ChannelAdapter>> = vec![Arc::new(line)];

    linehook_gateway::start_server(
        &config.listen_addr(),
        adapters,
        linehook_gateway::shutdown_signal(),
    )
    .await
}

async fn check_secrets(config: AppConfig) -> Result<()> {
    let credentials = bootstrap::credentials(&config)
        .await
        .context("Credential bootstrap failed")?;
    let key = KmsKeyConfig::from_env(&EnvVars::from_process())?.key_identifier();
    print!("{}", secrets_summary(&config.secrets.ciphertext_path, &key, &credentials));
    Ok(())
}

/// Report printed by `check-secrets`. Credential values appear only as lengths.
fn secrets_summary(ciphertext: &Path, key: &KeyIdentifier, credentials: &Credentials) -> String {
    format!(
        "ciphertext:  {}\nkey:         {key}\ncredentials: {credentials:?}\nstatus:      ok\n",
        ciphertext.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_summary_names_key_without_secret_values() {
        let key = KeyIdentifier::new("proj", "ring", "line");
        let credentials = Credentials::new("s3cr3t", "tok-abcdef").unwrap();
        let summary = secrets_summary(Path::new("secrets.json.enc"), &key, &credentials);

        assert!(summary.contains("ciphertext:  secrets.json.enc\n"));
        assert!(summary
            .contains("key:         projects/proj/locations/global/keyRings/ring/cryptoKeys/line\n"));
        assert!(summary.contains("***(6 bytes)"));
        assert!(summary.contains("***(10 bytes)"));
        assert!(!summary.contains("s3cr3t"));
        assert!(!summary.contains("tok-abcdef"));
    }
}
