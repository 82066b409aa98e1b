//! AWS provider metadata.

use crate::metadata::{insert_if_set, CloudMetadata};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Environment-variable names exposed by the AWS variant.
pub mod keys {
    /// Access key id.
    pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
    /// Secret access key.
    pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
    /// Route53 hosted zone id.
    pub const HOSTED_ZONE_ID: &str = "AWS_HOSTED_ZONE_ID";
}

/// Provisioning credentials for AWS-managed nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsMetadata {
    /// Access key id.
    #[serde(rename = "AWS_ACCESS_KEY_ID", skip_serializing_if = "Option::is_none", default)]
    pub access_key_id: Option<String>,

    /// Secret access key.
    #[serde(rename = "AWS_SECRET_ACCESS_KEY", skip_serializing_if = "Option::is_none", default)]
    pub secret_access_key: Option<String>,

    /// Route53 hosted zone backing the cluster's DNS records.
    #[serde(rename = "AWS_HOSTED_ZONE_ID", skip_serializing_if = "Option::is_none", default)]
    pub hosted_zone_id: Option<String>,
}

impl CloudMetadata for AwsMetadata {
    fn env_vars(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        insert_if_set(&mut env, keys::ACCESS_KEY_ID, &self.access_key_id);
        insert_if_set(&mut env, keys::SECRET_ACCESS_KEY, &self.secret_access_key);
        insert_if_set(&mut env, keys::HOSTED_ZONE_ID, &self.hosted_zone_id);
        env
    }

    fn update_details(&mut self, config: &HashMap<String, String>) {
        for (key, value) in config {
            match key.as_str() {
                keys::ACCESS_KEY_ID => self.access_key_id = Some(value.clone()),
                keys::SECRET_ACCESS_KEY => self.secret_access_key = Some(value.clone()),
                keys::HOSTED_ZONE_ID => self.hosted_zone_id = Some(value.clone()),
                _ => {}
            }
        }
    }
}
