//! Provider configuration records.
//!
//! A [`ProviderConfig`] is the persistence-facing owner of one provider's
//! cloud metadata. The metadata variant is chosen once, from the record's
//! [`CloudType`], when the record is constructed; it is never re-decided
//! for the lifetime of the record.

use crate::aws::AwsMetadata;
use crate::error::CloudConfigError;
use crate::gcp::GcpMetadata;
use crate::kubernetes::KubernetesMetadata;
use crate::metadata::CloudMetadata;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Infrastructure providers a configuration record can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudType {
    /// Amazon Web Services.
    Aws,
    /// Google Cloud Platform.
    Gcp,
    /// Kubernetes-managed nodes.
    Kubernetes,
    /// Pre-created hosts; carries no cloud metadata.
    OnPrem,
}

impl std::fmt::Display for CloudType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CloudType::Aws => "aws",
            CloudType::Gcp => "gcp",
            CloudType::Kubernetes => "kubernetes",
            CloudType::OnPrem => "onprem",
        };
        f.write_str(name)
    }
}

/// Configuration record owning one provider's cloud metadata.
///
/// Reads (`env_vars`) may run concurrently from multiple executor
/// invocations; writes (`update_details`) are serialized against them, so a
/// reader never observes a partially merged field set.
pub struct ProviderConfig {
    uuid: Uuid,
    name: String,
    cloud_type: CloudType,
    metadata: RwLock<Option<Box<dyn CloudMetadata>>>,
}

impl ProviderConfig {
    /// Create a record with empty metadata for its provider type.
    #[must_use]
    pub fn new(name: impl Into<String>, cloud_type: CloudType) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            cloud_type,
            metadata: RwLock::new(empty_metadata(cloud_type)),
        }
    }

    /// Create a record from a persisted JSON configuration section.
    ///
    /// # Errors
    /// Returns [`CloudConfigError::MalformedSection`] when the section does
    /// not deserialize into the provider's variant, and
    /// [`CloudConfigError::UnexpectedSection`] when the provider type does
    /// not accept metadata at all.
    pub fn from_config_section(
        name: impl Into<String>,
        cloud_type: CloudType,
        section: &serde_json::Value,
    ) -> Result<Self, CloudConfigError> {
        let metadata = parse_metadata(cloud_type, section)?;
        Ok(Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            cloud_type,
            metadata: RwLock::new(metadata),
        })
    }

    /// Record uuid.
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Human-facing provider name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider type this record was constructed for.
    #[inline]
    #[must_use]
    pub fn cloud_type(&self) -> CloudType {
        self.cloud_type
    }

    /// Derive the provisioning environment from the current metadata state.
    ///
    /// Providers without metadata yield an empty mapping.
    #[must_use]
    pub fn env_vars(&self) -> BTreeMap<String, String> {
        match self.metadata.read().as_ref() {
            Some(metadata) => metadata.env_vars(),
            None => BTreeMap::new(),
        }
    }

    /// Merge a partial configuration edit into the metadata.
    ///
    /// Providers without metadata ignore every key.
    pub fn update_details(&self, config: &HashMap<String, String>) {
        if let Some(metadata) = self.metadata.write().as_mut() {
            metadata.update_details(config);
            tracing::debug!(provider = %self.name, cloud = %self.cloud_type, keys = config.len(), "merged provider configuration edit");
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("cloud_type", &self.cloud_type)
            .finish_non_exhaustive()
    }
}

fn empty_metadata(cloud_type: CloudType) -> Option<Box<dyn CloudMetadata>> {
    match cloud_type {
        CloudType::Aws => Some(Box::new(AwsMetadata::default())),
        CloudType::Gcp => Some(Box::new(GcpMetadata::default())),
        CloudType::Kubernetes => Some(Box::new(KubernetesMetadata::default())),
        CloudType::OnPrem => None,
    }
}

fn parse_metadata(
    cloud_type: CloudType,
    section: &serde_json::Value,
) -> Result<Option<Box<dyn CloudMetadata>>, CloudConfigError> {
    let malformed = |source| CloudConfigError::MalformedSection { cloud: cloud_type, source };
    match cloud_type {
        CloudType::Aws => {
            let metadata: AwsMetadata = serde_json::from_value(section.clone()).map_err(malformed)?;
            Ok(Some(Box::new(metadata)))
        }
        CloudType::Gcp => {
            let metadata: GcpMetadata = serde_json::from_value(section.clone()).map_err(malformed)?;
            Ok(Some(Box::new(metadata)))
        }
        CloudType::Kubernetes => {
            let metadata: KubernetesMetadata =
                serde_json::from_value(section.clone()).map_err(malformed)?;
            Ok(Some(Box::new(metadata)))
        }
        CloudType::OnPrem => {
            if section.as_object().is_some_and(|o| !o.is_empty()) {
                return Err(CloudConfigError::UnexpectedSection(cloud_type));
            }
            Ok(None)
        }
    }
}
