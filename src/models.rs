//! Core data models for unmanaged-cluster
//!
//! Defines the structured records produced by the mapping parsers:
//! - `PortMapping`: a host-to-container port forward
//! - `InstallPackageMapping`: a package to install during bootstrapping
//!
//! Both serialize with the same canonical tags used across the config file,
//! environment variables, and command-line argument map.

use serde::{Deserialize, Serialize};

/// IP protocol for a forwarded port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Sctp,
}

impl Protocol {
    /// Parse a protocol name case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tcp" => Some(Protocol::Tcp),
            "udp" => Some(Protocol::Udp),
            "sctp" => Some(Protocol::Sctp),
            _ => None,
        }
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Sctp => "sctp",
        }
    }
}

/// A mapping between a host port and a container port
///
/// Unset members are omitted from the YAML rendering. A `host_port` of 0
/// means "unset" and a missing `protocol` means any protocol.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortMapping {
    /// Address on the host to listen on
    #[serde(
        rename = "ListenAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub listen_address: Option<String>,

    /// Port on the container to map to
    #[serde(rename = "ContainerPort")]
    pub container_port: u16,

    /// Port on the host machine
    #[serde(rename = "HostPort", default, skip_serializing_if = "is_unset_port")]
    pub host_port: u16,

    /// IP protocol (tcp, udp, sctp)
    #[serde(rename = "Protocol", default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
}

fn is_unset_port(port: &u16) -> bool {
    *port == 0
}

/// A package to install into the cluster during bootstrapping
///
/// Only `name` is required; empty members mean "unset" and are omitted from
/// the YAML rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstallPackageMapping {
    /// Name of the package
    #[serde(rename = "Name")]
    pub name: String,

    /// Version of the package
    #[serde(rename = "Version", default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Path to a values file used to configure the package
    #[serde(rename = "Config", default, skip_serializing_if = "String::is_empty")]
    pub config: String,

    /// Namespace to install the package into
    #[serde(
        rename = "Namespace",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub namespace: String,
}

impl InstallPackageMapping {
    /// Create a mapping with only the required name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
