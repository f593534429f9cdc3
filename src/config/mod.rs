//! Configuration module for unmanaged-cluster
//!
//! Implements the configuration hierarchy:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (TANZU_*)
//! 3. Cluster configuration file (YAML)
//! 4. Built-in defaults (fallback when a field is still empty)

mod defaults;
mod loader;
mod resolver;
mod types;

pub use defaults::{DefaultValue, DefaultValues};
pub use loader::{
    cluster_config_path, load_with_warnings, render_config_to_file, render_file_to_config,
    tanzu_config_path, tanzu_home_dir, tanzu_tkg_config_path, unmanaged_config_path,
    ConfigWarning, TANZU_TEST_HOME_VAR,
};
pub use resolver::{field_name_to_env_name, initialize_configuration, Resolver};
pub use types::*;
