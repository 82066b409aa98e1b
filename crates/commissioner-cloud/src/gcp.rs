//! GCP provider metadata.

use crate::metadata::{insert_if_set, CloudMetadata};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Environment-variable names exposed by the GCP variant.
pub mod keys {
    /// GCE project the nodes live in.
    pub const PROJECT: &str = "GCE_PROJECT";
    /// Path to the service-account credentials file.
    pub const APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
}

/// Provisioning settings for GCP-managed nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcpMetadata {
    /// GCE project id.
    #[serde(rename = "GCE_PROJECT", skip_serializing_if = "Option::is_none", default)]
    pub project: Option<String>,

    /// Service-account credentials file path.
    #[serde(
        rename = "GOOGLE_APPLICATION_CREDENTIALS",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub application_credentials: Option<String>,
}

impl CloudMetadata for GcpMetadata {
    fn env_vars(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        insert_if_set(&mut env, keys::PROJECT, &self.project);
        insert_if_set(&mut env, keys::APPLICATION_CREDENTIALS, &self.application_credentials);
        env
    }

    fn update_details(&mut self, config: &HashMap<String, String>) {
        for (key, value) in config {
            match key.as_str() {
                keys::PROJECT => self.project = Some(value.clone()),
                keys::APPLICATION_CREDENTIALS => self.application_credentials = Some(value.clone()),
                _ => {}
            }
        }
    }
}
