//! Configuration type definitions
//!
//! `ClusterConfig` is the resolved settings object consumed by the
//! cluster-bootstrap collaborators. Each field carries a canonical name used
//! simultaneously as its YAML tag, as the input to environment-variable name
//! derivation, and as its key in the command-line argument map.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{InstallPackageMapping, PortMapping};

/// Canonical field names, usable as argument-map keys
pub const CLUSTER_CONFIG_FILE: &str = "ClusterConfigFile";
pub const CLUSTER_NAME: &str = "ClusterName";
pub const KUBECONFIG_PATH: &str = "KubeconfigPath";
pub const EXISTING_CLUSTER_KUBECONFIG: &str = "ExistingClusterKubeconfig";
pub const NODE_IMAGE: &str = "NodeImage";
pub const PROVIDER: &str = "Provider";
pub const CNI: &str = "Cni";
pub const POD_CIDR: &str = "PodCidr";
pub const SERVICE_CIDR: &str = "ServiceCidr";
pub const TKR_LOCATION: &str = "TkrLocation";
pub const ADDITIONAL_PACKAGE_REPOS: &str = "AdditionalPackageRepos";
pub const PORTS_TO_FORWARD: &str = "PortsToForward";
pub const INSTALL_PACKAGES: &str = "InstallPackages";
pub const SKIP_PREFLIGHT: &str = "SkipPreflight";
pub const CONTROL_PLANE_NODE_COUNT: &str = "ControlPlaneNodeCount";
pub const WORKER_NODE_COUNT: &str = "WorkerNodeCount";
pub const LOG_FILE: &str = "LogFile";
pub const TTY: &str = "Tty";

/// Infrastructure providers understood by the bootstrap collaborators
pub const PROVIDER_KIND: &str = "kind";
pub const PROVIDER_MINIKUBE: &str = "minikube";
pub const PROVIDER_NONE: &str = "none";

/// All the configuration settings for creating an unmanaged cluster
///
/// Constructed fresh per invocation by the resolver and read-only
/// thereafter. The two open configuration maps are provider-defined and
/// passed through opaquely; they are populated from the config file only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Name of the cluster
    #[serde(rename = "ClusterName", default)]
    pub cluster_name: String,

    /// Location where the kubeconfig will be persisted after the cluster
    /// is created
    #[serde(rename = "KubeconfigPath", default)]
    pub kubeconfig_path: String,

    /// Path to the kubeconfig of an existing cluster to use
    #[serde(rename = "ExistingClusterKubeconfig", default)]
    pub existing_cluster_kubeconfig: String,

    /// Host OS image to use for Kubernetes nodes
    #[serde(rename = "NodeImage", default)]
    pub node_image: String,

    /// Infrastructure provider to use (kind, minikube, or none)
    #[serde(rename = "Provider", default)]
    pub provider: String,

    /// Optional provider-specific configuration; the exact keys and values
    /// accepted are determined by the provider
    #[serde(rename = "ProviderConfiguration", default)]
    pub provider_configuration: BTreeMap<String, serde_yaml_ng::Value>,

    /// Networking CNI to use in the cluster
    #[serde(rename = "Cni", default)]
    pub cni: String,

    /// Optional CNI-plugin-specific configuration
    #[serde(rename = "CniConfiguration", default)]
    pub cni_configuration: BTreeMap<String, serde_yaml_ng::Value>,

    /// Pod CIDR range to assign pod IP addresses from
    #[serde(rename = "PodCidr", default)]
    pub pod_cidr: String,

    /// Service CIDR range to assign service IP addresses from
    #[serde(rename = "ServiceCidr", default)]
    pub service_cidr: String,

    /// Location of the Tanzu Kubernetes Release (TKR) data
    #[serde(rename = "TkrLocation", default)]
    pub tkr_location: String,

    /// Extra package repositories to install during bootstrapping
    #[serde(rename = "AdditionalPackageRepos", default)]
    pub additional_package_repos: Vec<String>,

    /// Host-to-container ports to expose
    #[serde(rename = "PortsToForward", default)]
    pub ports_to_forward: Vec<PortMapping>,

    /// Packages to install during bootstrapping
    #[serde(rename = "InstallPackages", default)]
    pub install_packages: Vec<InstallPackageMapping>,

    /// Whether preflight checks are skipped prior to deploying the cluster
    #[serde(rename = "SkipPreflight", default)]
    pub skip_preflight_checks: bool,

    /// Number of control plane nodes to deploy
    #[serde(rename = "ControlPlaneNodeCount", default)]
    pub control_plane_node_count: String,

    /// Number of worker nodes to deploy
    #[serde(rename = "WorkerNodeCount", default)]
    pub worker_node_count: String,

    /// Path to write the bootstrap log to
    #[serde(rename = "LogFile", default)]
    pub log_file: String,

    /// Whether output is stylized for an interactive terminal
    #[serde(rename = "Tty", default)]
    pub tty: bool,
}

/// A dynamically-typed command-line argument value
///
/// The variant must match the semantic type of the field named by its key;
/// a mismatch is a caller contract violation and fails resolution with
/// `ClusterError::ArgumentType`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Bool(bool),
    String(String),
    StringList(Vec<String>),
    PortMappingList(Vec<PortMapping>),
    InstallPackageList(Vec<InstallPackageMapping>),
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(value: Vec<String>) -> Self {
        ArgValue::StringList(value)
    }
}

impl From<Vec<PortMapping>> for ArgValue {
    fn from(value: Vec<PortMapping>) -> Self {
        ArgValue::PortMappingList(value)
    }
}

impl From<Vec<InstallPackageMapping>> for ArgValue {
    fn from(value: Vec<InstallPackageMapping>) -> Self {
        ArgValue::InstallPackageList(value)
    }
}

/// Command-line-supplied values keyed by canonical field name
pub type ArgMap = HashMap<String, ArgValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_config_deserialize_defaults_missing_fields() {
        let yaml = "ClusterName: test";
        let config: ClusterConfig = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(config.cluster_name, "test");
        assert_eq!(config.provider, "");
        assert!(config.additional_package_repos.is_empty());
        assert!(config.provider_configuration.is_empty());
        assert!(!config.skip_preflight_checks);
    }

    #[test]
    fn test_cluster_config_canonical_yaml_tags() {
        let config = ClusterConfig {
            cluster_name: "test".to_string(),
            pod_cidr: "10.244.0.0/16".to_string(),
            control_plane_node_count: "1".to_string(),
            ..ClusterConfig::default()
        };

        let yaml = serde_yaml_ng::to_string(&config).unwrap();

        assert!(yaml.contains("ClusterName: test"));
        assert!(yaml.contains("PodCidr: 10.244.0.0/16"));
        assert!(yaml.contains("ControlPlaneNodeCount: '1'"));
    }

    #[test]
    fn test_cluster_config_provider_configuration_is_opaque() {
        let yaml = r#"
ClusterName: test
ProviderConfiguration:
  rawKindConfig: |
    kind: Cluster
  nested:
    key: value
"#;
        let config: ClusterConfig = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(config.provider_configuration.len(), 2);
        assert!(config.provider_configuration.contains_key("rawKindConfig"));
    }

    #[test]
    fn test_arg_value_from_impls() {
        assert_eq!(ArgValue::from(true), ArgValue::Bool(true));
        assert_eq!(
            ArgValue::from("kind"),
            ArgValue::String("kind".to_string())
        );
        assert_eq!(
            ArgValue::from(vec!["repo".to_string()]),
            ArgValue::StringList(vec!["repo".to_string()])
        );
    }
}
