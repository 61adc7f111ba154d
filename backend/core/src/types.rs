use std::fmt;

/// Fully qualified Cloud KMS crypto key resource name.
///
/// Always in the `global` location, matching how the secrets key is provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyIdentifier {
    project: String,
    key_ring: String,
    key: String,
}

impl KeyIdentifier {
    pub fn new(
        project: impl Into<String>,
        key_ring: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            key_ring: key_ring.into(),
            key: key.into(),
        }
    }

    /// Resource name as expected by the KMS API.
    pub fn resource_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/locations/global/keyRings/{}/cryptoKeys/{}",
            self.project, self.key_ring, self.key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_resource_name() {
        let key = KeyIdentifier::new("my-project", "bot-ring", "line-secrets");
        assert_eq!(
            key.resource_name(),
            "projects/my-project/locations/global/keyRings/bot-ring/cryptoKeys/line-secrets"
        );
    }
}
