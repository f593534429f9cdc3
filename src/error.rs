//! Error types for the unmanaged-cluster configuration engine
//!
//! Uses `thiserror` for library errors. Binary entry points wrap these in
//! `anyhow` for display.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unmanaged-cluster operations
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Main error type for configuration resolution and persistence
#[derive(Error, Debug)]
pub enum ClusterError {
    /// Cluster name missing after merging every configuration source
    #[error("cluster name must be provided")]
    ClusterNameRequired,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file exists but does not deserialize onto the schema
    #[error("configuration at {file} was invalid: {message}")]
    InvalidConfigFile { file: PathBuf, message: String },

    /// YAML serialization error
    #[error("failed to render configuration: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The user home directory could not be resolved
    #[error("failed to resolve the user home directory")]
    HomeDirNotFound,

    /// Refusal to clobber a previously generated configuration
    #[error("failed to create config file at {path}, does it already exist?")]
    ConfigFileExists { path: PathBuf },

    /// Port mapping carried an unknown protocol suffix
    #[error("failed to parse protocol '{protocol}', must be tcp, udp, or sctp")]
    InvalidProtocol { protocol: String },

    /// A port segment of a port mapping was not a base-10 integer
    #[error("failed to parse port mapping, invalid port provided: '{part}'")]
    InvalidPort { part: String },

    /// Port mapping had zero or more than three colon-delimited segments
    #[error("failed to parse port mapping '{mapping}', expected format [listenAddress:]containerPort[:hostPort][/protocol]")]
    InvalidPortMapping { mapping: String },

    /// Install package mapping was empty or had more than four segments
    #[error("failed to parse install package mapping '{mapping}', expected format name[:version[:config[:namespace]]]")]
    InvalidPackageMapping { mapping: String },

    /// Caller supplied an argument whose runtime type does not match the
    /// field's semantic type
    #[error("argument '{name}' has the wrong type, expected {expected}")]
    ArgumentType { name: String, expected: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_cluster_name_required() {
        let err = ClusterError::ClusterNameRequired;
        assert_eq!(err.to_string(), "cluster name must be provided");
    }

    #[test]
    fn test_error_display_invalid_port() {
        let err = ClusterError::InvalidPort {
            part: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse port mapping, invalid port provided: 'abc'"
        );
    }

    #[test]
    fn test_error_display_config_file_exists() {
        let err = ClusterError::ConfigFileExists {
            path: PathBuf::from("my-cluster.yaml"),
        };
        assert_eq!(
            err.to_string(),
            "failed to create config file at my-cluster.yaml, does it already exist?"
        );
    }
}
