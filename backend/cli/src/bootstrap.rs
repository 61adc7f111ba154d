use std::sync::Arc;

use linehook_config::{AppConfig, EnvVars};
use linehook_core::{BootstrapError, Credentials};
use linehook_secrets::{GcpKmsClient, SecretStore};

/// Run the one-shot credential bootstrap against Cloud KMS.
pub async fn credentials(config: &AppConfig) -> Result<Credentials, BootstrapError> {
    let kms = Arc::new(GcpKmsClient::from_config(&config.secrets));
    SecretStore::new(&config.secrets, EnvVars::from_process(), kms)
        .bootstrap()
        .await
}
