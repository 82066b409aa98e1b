//! The cloud metadata extension point.

use std::collections::{BTreeMap, HashMap};

/// Provider-specific bag of provisioning settings.
///
/// Implementations are pure configuration values: no I/O, no state machine.
/// Absent optional fields are represented by omission in [`env_vars`], never
/// by empty strings or errors.
///
/// [`env_vars`]: CloudMetadata::env_vars
pub trait CloudMetadata: Send + Sync {
    /// Derive the provisioning environment from the current field state.
    ///
    /// Deterministic, read-only, infallible. Unset fields are omitted from
    /// the mapping.
    fn env_vars(&self) -> BTreeMap<String, String>;

    /// Merge a partial mapping of raw configuration key/value pairs.
    ///
    /// Recognized keys overwrite the corresponding field; unrecognized keys
    /// are ignored; keys absent from `config` leave existing values
    /// untouched. Applying the same input twice is a no-op the second time.
    fn update_details(&mut self, config: &HashMap<String, String>);
}

/// Insert `value` under `key` when the field is set.
pub(crate) fn insert_if_set(env: &mut BTreeMap<String, String>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        env.insert(key.to_string(), value.clone());
    }
}
