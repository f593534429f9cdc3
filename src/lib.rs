//! unmanaged-cluster - configuration engine for local Kubernetes clusters
//!
//! Determines the effective set of typed settings for bootstrapping an
//! unmanaged cluster from four layered sources (built-in defaults, a YAML
//! configuration file, environment variables, and command-line arguments)
//! and produces a single validated configuration object for the
//! cluster-creation collaborators.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;

// Re-exports for convenience
pub use config::{
    initialize_configuration, ArgMap, ArgValue, ClusterConfig, DefaultValue, DefaultValues,
    Resolver,
};
pub use error::{ClusterError, ClusterResult};
pub use models::{InstallPackageMapping, PortMapping, Protocol};
pub use parser::{parse_install_package_mappings, parse_port_mapping, parse_port_mappings};
