//! Secret bootstrap: turns the encrypted credentials blob into [`Credentials`].
//!
//! [`SecretStore`] runs once before the server starts. [`GcpKmsClient`] is the
//! production [`KeyManagementClient`] talking to the Cloud KMS REST API.
//!
//! [`Credentials`]: linehook_core::Credentials
//! [`KeyManagementClient`]: linehook_core::KeyManagementClient

pub mod gcp_kms;
pub mod store;
pub mod token;

pub use gcp_kms::GcpKmsClient;
pub use store::SecretStore;
pub use token::AccessTokenSource;
