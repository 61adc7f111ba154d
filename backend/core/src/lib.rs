pub mod credentials;
pub mod error;
pub mod message;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::{
    BootstrapError, ConfigError, CredentialsError, DecryptionError, ReplyError, SignatureError,
    WebhookError,
};
pub use message::OutboundMessage;
pub use traits::{KeyManagementClient, MessageReplier};
pub use types::KeyIdentifier;
