//! Kubernetes provider metadata.
//!
//! Field names on the wire double as the environment-variable vocabulary
//! consumed by the node command executor. `KUBECONFIG_IMAGE_PULL_SECRET_NAME`
//! and `KUBECONFIG_PULL_SECRET_NAME` are distinct settings and must stay
//! distinct keys.

use crate::metadata::{insert_if_set, CloudMetadata};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Environment-variable names exposed by the Kubernetes variant.
pub mod keys {
    /// Config-provider identifier (gke, eks, aks, ...).
    pub const PROVIDER: &str = "KUBECONFIG_PROVIDER";
    /// Service account the provisioner acts as.
    pub const SERVICE_ACCOUNT: &str = "KUBECONFIG_SERVICE_ACCOUNT";
    /// Image registry address.
    pub const IMAGE_REGISTRY: &str = "KUBECONFIG_IMAGE_REGISTRY";
    /// Name of the image pull secret.
    pub const IMAGE_PULL_SECRET_NAME: &str = "KUBECONFIG_IMAGE_PULL_SECRET_NAME";
    /// Pull secret reference.
    pub const PULL_SECRET: &str = "KUBECONFIG_PULL_SECRET";
    /// Raw kubeconfig content.
    pub const KUBECONFIG: &str = "KUBECONFIG";
    /// Storage class names.
    pub const STORAGE_CLASSES: &str = "KUBECONFIG_STORAGE_CLASSES";
    /// Pull secret content.
    pub const PULL_SECRET_CONTENT: &str = "KUBECONFIG_PULL_SECRET_CONTENT";
    /// Name of the pull secret, distinct from the image pull secret name.
    pub const PULL_SECRET_NAME: &str = "KUBECONFIG_PULL_SECRET_NAME";
}

/// Provisioning settings for Kubernetes-managed nodes.
///
/// All fields are optional; only set fields appear in the serialized form
/// and in the derived environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesMetadata {
    /// Config-provider identifier.
    #[serde(rename = "KUBECONFIG_PROVIDER", skip_serializing_if = "Option::is_none", default)]
    pub provider: Option<String>,

    /// Service account identifier.
    #[serde(
        rename = "KUBECONFIG_SERVICE_ACCOUNT",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub service_account: Option<String>,

    /// Image registry address.
    #[serde(
        rename = "KUBECONFIG_IMAGE_REGISTRY",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub image_registry: Option<String>,

    /// Image pull secret name.
    #[serde(
        rename = "KUBECONFIG_IMAGE_PULL_SECRET_NAME",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub image_pull_secret_name: Option<String>,

    /// Pull secret reference.
    #[serde(rename = "KUBECONFIG_PULL_SECRET", skip_serializing_if = "Option::is_none", default)]
    pub pull_secret: Option<String>,

    /// Raw kubeconfig content.
    #[serde(rename = "KUBECONFIG", skip_serializing_if = "Option::is_none", default)]
    pub kube_config: Option<String>,

    /// Storage class names.
    #[serde(
        rename = "KUBECONFIG_STORAGE_CLASSES",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub storage_classes: Option<String>,

    /// Pull secret content.
    #[serde(
        rename = "KUBECONFIG_PULL_SECRET_CONTENT",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub pull_secret_content: Option<String>,

    /// Pull secret name, kept separate from the image pull secret name.
    #[serde(
        rename = "KUBECONFIG_PULL_SECRET_NAME",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub pull_secret_name: Option<String>,
}

impl CloudMetadata for KubernetesMetadata {
    fn env_vars(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        insert_if_set(&mut env, keys::PROVIDER, &self.provider);
        insert_if_set(&mut env, keys::SERVICE_ACCOUNT, &self.service_account);
        insert_if_set(&mut env, keys::IMAGE_REGISTRY, &self.image_registry);
        insert_if_set(&mut env, keys::IMAGE_PULL_SECRET_NAME, &self.image_pull_secret_name);
        insert_if_set(&mut env, keys::PULL_SECRET, &self.pull_secret);
        insert_if_set(&mut env, keys::KUBECONFIG, &self.kube_config);
        insert_if_set(&mut env, keys::STORAGE_CLASSES, &self.storage_classes);
        insert_if_set(&mut env, keys::PULL_SECRET_CONTENT, &self.pull_secret_content);
        insert_if_set(&mut env, keys::PULL_SECRET_NAME, &self.pull_secret_name);
        env
    }

    fn update_details(&mut self, config: &HashMap<String, String>) {
        for (key, value) in config {
            match key.as_str() {
                keys::PROVIDER => self.provider = Some(value.clone()),
                keys::SERVICE_ACCOUNT => self.service_account = Some(value.clone()),
                keys::IMAGE_REGISTRY => self.image_registry = Some(value.clone()),
                keys::IMAGE_PULL_SECRET_NAME => self.image_pull_secret_name = Some(value.clone()),
                keys::PULL_SECRET => self.pull_secret = Some(value.clone()),
                keys::KUBECONFIG => self.kube_config = Some(value.clone()),
                keys::STORAGE_CLASSES => self.storage_classes = Some(value.clone()),
                keys::PULL_SECRET_CONTENT => self.pull_secret_content = Some(value.clone()),
                keys::PULL_SECRET_NAME => self.pull_secret_name = Some(value.clone()),
                _ => {}
            }
        }
    }
}
