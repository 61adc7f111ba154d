//! One-shot credential bootstrap.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use linehook_config::{EnvVars, KmsKeyConfig, SecretsConfig};
use linehook_core::{BootstrapError, Credentials, DecryptionError, KeyManagementClient};
use tracing::{info, instrument};

/// Produces the [`Credentials`] used for the lifetime of the process.
///
/// `bootstrap` consumes the store, so a store can only ever produce one value.
pub struct SecretStore {
    ciphertext_path: PathBuf,
    env: EnvVars,
    kms: Arc<dyn KeyManagementClient>,
    decrypt_timeout: Duration,
}

impl SecretStore {
    pub fn new(config: &SecretsConfig, env: EnvVars, kms: Arc<dyn KeyManagementClient>) -> Self {
        Self {
            ciphertext_path: config.ciphertext_path.clone(),
            env,
            kms,
            decrypt_timeout: Duration::from_secs(config.kms_timeout_secs),
        }
    }

    pub fn with_decrypt_timeout(mut self, timeout: Duration) -> Self {
        self.decrypt_timeout = timeout;
        self
    }

    /// Read, decrypt, and parse the credentials blob.
    ///
    /// Every error is fatal for the caller: the server must not start without
    /// the returned value.
    #[instrument(skip(self), fields(path = %self.ciphertext_path.display()))]
    pub async fn bootstrap(self) -> Result<Credentials, BootstrapError> {
        let ciphertext = tokio::fs::read(&self.ciphertext_path)
            .await
            .map_err(|source| BootstrapError::Storage {
                path: self.ciphertext_path.clone(),
                source,
            })?;

        let key = KmsKeyConfig::from_env(&self.env)?.key_identifier();
        info!(key = %key, ciphertext_bytes = ciphertext.len(), "Decrypting channel credentials");

        let plaintext = tokio::time::timeout(self.decrypt_timeout, self.kms.decrypt(&key, &ciphertext))
            .await
            .map_err(|_| DecryptionError::Timeout(self.decrypt_timeout))??;

        let credentials = Credentials::from_json_slice(&plaintext)?;
        info!(key = %key, "Channel credentials ready");
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use linehook_core::{ConfigError, CredentialsError, KeyIdentifier};
    use std::io::Write;
    use std::sync::Mutex;

    const FIXTURE_KEY: u8 = 0x5a;
    const PLAINTEXT: &str =
        r#"{"line_channel_secret":"fixture-secret","line_channel_access_token":"fixture-token"}"#;

    fn fixture_encrypt(plaintext: &[u8]) -> Vec<u8> {
        plaintext.iter().map(|b| b ^ FIXTURE_KEY).collect()
    }

    /// KMS stand-in that reverses `fixture_encrypt` and records the keys it saw.
    #[derive(Default)]
    struct FixtureKms {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl KeyManagementClient for FixtureKms {
        async fn decrypt(
            &self,
            key: &KeyIdentifier,
            ciphertext: &[u8],
        ) -> Result<Vec<u8>, DecryptionError> {
            self.seen.lock().unwrap().push(key.to_string());
            Ok(fixture_encrypt(ciphertext))
        }
    }

    struct FailingKms;

    #[async_trait]
    impl KeyManagementClient for FailingKms {
        async fn decrypt(&self, key: &KeyIdentifier, _: &[u8]) -> Result<Vec<u8>, DecryptionError> {
            Err(DecryptionError::Rejected {
                key: key.to_string(),
                status: 404,
                message: "NOT_FOUND: CryptoKey not found".into(),
            })
        }
    }

    struct StalledKms;

    #[async_trait]
    impl KeyManagementClient for StalledKms {
        async fn decrypt(&self, _: &KeyIdentifier, _: &[u8]) -> Result<Vec<u8>, DecryptionError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
    }

    fn kms_env() -> EnvVars {
        EnvVars::from_pairs(&[
            ("GCP_PROJECT_ID", "bot-project"),
            ("KMS_KEY_RING_NAME", "bot-ring"),
            ("KMS_LINE_SECRETS_KEY_NAME", "line-secrets"),
        ])
    }

    fn blob(plaintext: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&fixture_encrypt(plaintext)).unwrap();
        file
    }

    fn config_for(path: impl Into<PathBuf>) -> SecretsConfig {
        SecretsConfig {
            ciphertext_path: path.into(),
            ..SecretsConfig::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_round_trips_fixture() {
        let file = blob(PLAINTEXT.as_bytes());
        let kms = Arc::new(FixtureKms::default());
        let store = SecretStore::new(&config_for(file.path()), kms_env(), kms.clone());

        let creds = store.bootstrap().await.unwrap();
        assert_eq!(creds.channel_secret(), "fixture-secret");
        assert_eq!(creds.channel_access_token(), "fixture-token");
        assert_eq!(
            *kms.seen.lock().unwrap(),
            vec!["projects/bot-project/locations/global/keyRings/bot-ring/cryptoKeys/line-secrets"]
        );
    }

    #[tokio::test]
    async fn missing_blob_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let kms = Arc::new(FixtureKms::default());
        let store = SecretStore::new(
            &config_for(dir.path().join("secrets.json.enc")),
            kms_env(),
            kms.clone(),
        );

        let err = store.bootstrap().await.unwrap_err();
        assert!(matches!(err, BootstrapError::Storage { .. }));
        assert!(kms.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_env_is_config_error() {
        let file = blob(PLAINTEXT.as_bytes());
        let env = EnvVars::from_pairs(&[("GCP_PROJECT_ID", "bot-project")]);
        let store = SecretStore::new(&config_for(file.path()), env, Arc::new(FixtureKms::default()));

        let err = store.bootstrap().await.unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Config(ConfigError::Missing(ref name)) if name == "KMS_KEY_RING_NAME"
        ));
    }

    #[tokio::test]
    async fn kms_failure_is_decryption_error() {
        let file = blob(PLAINTEXT.as_bytes());
        let store = SecretStore::new(&config_for(file.path()), kms_env(), Arc::new(FailingKms));

        let err = store.bootstrap().await.unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Decryption(DecryptionError::Rejected { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn stalled_kms_times_out() {
        let file = blob(PLAINTEXT.as_bytes());
        let store = SecretStore::new(&config_for(file.path()), kms_env(), Arc::new(StalledKms))
            .with_decrypt_timeout(Duration::from_millis(50));

        let err = store.bootstrap().await.unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Decryption(DecryptionError::Timeout(t)) if t == Duration::from_millis(50)
        ));
    }

    #[tokio::test]
    async fn malformed_plaintext_is_parse_error() {
        let file = blob(b"line_channel_secret=abc");
        let store = SecretStore::new(&config_for(file.path()), kms_env(), Arc::new(FixtureKms::default()));

        let err = store.bootstrap().await.unwrap_err();
        assert!(matches!(err, BootstrapError::Parse(CredentialsError::Malformed { .. })));
    }

    #[tokio::test]
    async fn missing_field_is_parse_error() {
        let file = blob(br#"{"line_channel_access_token":"fixture-token"}"#);
        let store = SecretStore::new(&config_for(file.path()), kms_env(), Arc::new(FixtureKms::default()));

        let err = store.bootstrap().await.unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Parse(CredentialsError::MissingField("line_channel_secret"))
        ));
    }

    #[tokio::test]
    async fn error_messages_never_echo_secret_material() {
        let file = blob(br#"{"line_channel_secret":12345678,"line_channel_access_token":"fixture-token"}"#);
        let store = SecretStore::new(&config_for(file.path()), kms_env(), Arc::new(FixtureKms::default()));

        let err = store.bootstrap().await.unwrap_err();
        let rendered = err.to_string();
        assert!(!rendered.contains("12345678"));
        assert!(!rendered.contains("fixture-token"));
    }
}
