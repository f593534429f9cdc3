//! Built-in default values
//!
//! Defaults are a fallback, not a layer: the resolver applies a default
//! only when a field is still empty after the config file, environment,
//! and explicit arguments have all had their say. The table is immutable
//! and injected into the resolver so tests can supply alternates.

use std::collections::HashMap;

use super::types;

/// A typed default for a single configuration field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    String(&'static str),
    List(&'static [&'static str]),
    Bool(bool),
}

/// Immutable table of built-in defaults keyed by canonical field name
#[derive(Debug, Clone)]
pub struct DefaultValues {
    values: HashMap<&'static str, DefaultValue>,
}

impl Default for DefaultValues {
    fn default() -> Self {
        let mut values = HashMap::new();
        values.insert(
            types::TKR_LOCATION,
            DefaultValue::String("projects.registry.vmware.com/tce/tkr:v0.17.0"),
        );
        values.insert(types::PROVIDER, DefaultValue::String(types::PROVIDER_KIND));
        values.insert(types::CNI, DefaultValue::String("antrea"));
        values.insert(types::POD_CIDR, DefaultValue::String("10.244.0.0/16"));
        values.insert(types::SERVICE_CIDR, DefaultValue::String("10.96.0.0/16"));
        values.insert(types::CONTROL_PLANE_NODE_COUNT, DefaultValue::String("1"));
        values.insert(types::WORKER_NODE_COUNT, DefaultValue::String("0"));
        values.insert(
            types::ADDITIONAL_PACKAGE_REPOS,
            DefaultValue::List(&["projects.registry.vmware.com/tce/main:v0.11.0"]),
        );
        values.insert(types::TTY, DefaultValue::Bool(true));
        Self { values }
    }
}

impl DefaultValues {
    /// A table with no registered defaults
    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Register or replace a default (primarily for tests)
    pub fn set(&mut self, name: &'static str, value: DefaultValue) {
        self.values.insert(name, value);
    }

    /// String default registered for `name`, if any
    pub fn string_for(&self, name: &str) -> Option<&'static str> {
        match self.values.get(name) {
            Some(DefaultValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// List default registered for `name`, if any
    pub fn list_for(&self, name: &str) -> Option<&'static [&'static str]> {
        match self.values.get(name) {
            Some(DefaultValue::List(l)) => Some(l),
            _ => None,
        }
    }

    /// Boolean default registered for `name`, if any
    pub fn bool_for(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(DefaultValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_defaults() {
        let defaults = DefaultValues::default();

        assert_eq!(defaults.string_for(types::PROVIDER), Some("kind"));
        assert_eq!(defaults.string_for(types::CNI), Some("antrea"));
        assert_eq!(defaults.string_for(types::POD_CIDR), Some("10.244.0.0/16"));
        assert_eq!(
            defaults.string_for(types::SERVICE_CIDR),
            Some("10.96.0.0/16")
        );
        assert_eq!(
            defaults.string_for(types::CONTROL_PLANE_NODE_COUNT),
            Some("1")
        );
        assert_eq!(defaults.string_for(types::WORKER_NODE_COUNT), Some("0"));
        assert_eq!(
            defaults.list_for(types::ADDITIONAL_PACKAGE_REPOS),
            Some(&["projects.registry.vmware.com/tce/main:v0.11.0"][..])
        );
        assert_eq!(defaults.bool_for(types::TTY), Some(true));
    }

    #[test]
    fn test_fields_without_defaults_return_none() {
        let defaults = DefaultValues::default();

        assert_eq!(defaults.string_for(types::CLUSTER_NAME), None);
        assert_eq!(defaults.string_for(types::NODE_IMAGE), None);
        assert_eq!(defaults.string_for(types::LOG_FILE), None);
        assert_eq!(defaults.bool_for(types::SKIP_PREFLIGHT), None);
    }

    #[test]
    fn test_type_mismatched_lookup_returns_none() {
        let defaults = DefaultValues::default();

        // Tty is registered as a bool; asking for a string yields nothing
        assert_eq!(defaults.string_for(types::TTY), None);
        assert_eq!(defaults.bool_for(types::PROVIDER), None);
    }

    #[test]
    fn test_empty_table_has_no_defaults() {
        let defaults = DefaultValues::empty();

        assert_eq!(defaults.string_for(types::PROVIDER), None);
    }
}
