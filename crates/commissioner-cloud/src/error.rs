//! Error types for provider configuration.

use crate::provider::CloudType;

/// Errors raised while parsing persisted provider configuration.
#[derive(Debug, thiserror::Error)]
pub enum CloudConfigError {
    /// The provider's configuration section does not match its variant shape.
    #[error("malformed {cloud} configuration section: {source}")]
    MalformedSection {
        /// Provider the section belongs to.
        cloud: CloudType,
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// The provider type carries no metadata section.
    #[error("provider type {0} does not accept a metadata section")]
    UnexpectedSection(CloudType),
}
