//! Configuration resolution
//!
//! Walks every declared configuration field and determines its effective
//! value from the layered sources. Per-field precedence, highest first:
//!
//! 1. Explicit command-line argument (present and non-empty)
//! 2. Environment variable (TANZU_*, set and non-empty)
//! 3. Value deserialized from the cluster config file
//! 4. Built-in default, applied only when the field is still empty
//!
//! Environment-derived parse failures never abort resolution; the offending
//! layer is skipped and resolution falls through to the next.

use std::path::Path;

use log::{debug, warn};

use crate::error::{ClusterError, ClusterResult};
use crate::models::{InstallPackageMapping, PortMapping};
use crate::parser::{parse_install_package_mappings, parse_port_mappings};

use super::defaults::DefaultValues;
use super::loader;
use super::types::{self, ArgMap, ArgValue, ClusterConfig};

/// Accessor and semantic kind for one declared configuration field
enum FieldKind {
    Bool(fn(&mut ClusterConfig) -> &mut bool),
    String(fn(&mut ClusterConfig) -> &mut String),
    StringList(fn(&mut ClusterConfig) -> &mut Vec<String>),
    PortMappingList(fn(&mut ClusterConfig) -> &mut Vec<PortMapping>),
    InstallPackageList(fn(&mut ClusterConfig) -> &mut Vec<InstallPackageMapping>),
}

struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
}

/// Every field the resolver walks, in declaration order.
///
/// `ProviderConfiguration` and `CniConfiguration` are intentionally absent:
/// the open configuration maps are populated from the config file only.
const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: types::CLUSTER_NAME,
        kind: FieldKind::String(|c| &mut c.cluster_name),
    },
    FieldSpec {
        name: types::KUBECONFIG_PATH,
        kind: FieldKind::String(|c| &mut c.kubeconfig_path),
    },
    FieldSpec {
        name: types::EXISTING_CLUSTER_KUBECONFIG,
        kind: FieldKind::String(|c| &mut c.existing_cluster_kubeconfig),
    },
    FieldSpec {
        name: types::NODE_IMAGE,
        kind: FieldKind::String(|c| &mut c.node_image),
    },
    FieldSpec {
        name: types::PROVIDER,
        kind: FieldKind::String(|c| &mut c.provider),
    },
    FieldSpec {
        name: types::CNI,
        kind: FieldKind::String(|c| &mut c.cni),
    },
    FieldSpec {
        name: types::POD_CIDR,
        kind: FieldKind::String(|c| &mut c.pod_cidr),
    },
    FieldSpec {
        name: types::SERVICE_CIDR,
        kind: FieldKind::String(|c| &mut c.service_cidr),
    },
    FieldSpec {
        name: types::TKR_LOCATION,
        kind: FieldKind::String(|c| &mut c.tkr_location),
    },
    FieldSpec {
        name: types::ADDITIONAL_PACKAGE_REPOS,
        kind: FieldKind::StringList(|c| &mut c.additional_package_repos),
    },
    FieldSpec {
        name: types::PORTS_TO_FORWARD,
        kind: FieldKind::PortMappingList(|c| &mut c.ports_to_forward),
    },
    FieldSpec {
        name: types::INSTALL_PACKAGES,
        kind: FieldKind::InstallPackageList(|c| &mut c.install_packages),
    },
    FieldSpec {
        name: types::SKIP_PREFLIGHT,
        kind: FieldKind::Bool(|c| &mut c.skip_preflight_checks),
    },
    FieldSpec {
        name: types::CONTROL_PLANE_NODE_COUNT,
        kind: FieldKind::String(|c| &mut c.control_plane_node_count),
    },
    FieldSpec {
        name: types::WORKER_NODE_COUNT,
        kind: FieldKind::String(|c| &mut c.worker_node_count),
    },
    FieldSpec {
        name: types::LOG_FILE,
        kind: FieldKind::String(|c| &mut c.log_file),
    },
    FieldSpec {
        name: types::TTY,
        kind: FieldKind::Bool(|c| &mut c.tty),
    },
];

/// Multi-source configuration resolver
///
/// Holds the immutable default table; construct one per invocation (or use
/// [`initialize_configuration`] for the built-in defaults).
pub struct Resolver {
    defaults: DefaultValues,
}

impl Resolver {
    pub fn new(defaults: DefaultValues) -> Self {
        Self { defaults }
    }

    /// Determine the effective configuration for cluster creation.
    ///
    /// Returns either a fully valid `ClusterConfig` or an error, never a
    /// partial configuration.
    pub fn resolve(&self, args: &ArgMap) -> ClusterResult<ClusterConfig> {
        let mut config = ClusterConfig::default();

        // First, populate the base layer from a supplied config file
        match args.get(types::CLUSTER_CONFIG_FILE) {
            Some(ArgValue::String(path)) if !path.is_empty() => {
                debug!("loading configuration base from {path}");
                config = loader::render_file_to_config(Path::new(path))?;
            }
            Some(ArgValue::String(_)) | None => {}
            Some(_) => return Err(argument_type_error(types::CLUSTER_CONFIG_FILE, "string")),
        }

        for field in FIELDS {
            self.set_field(&mut config, field, args)?;
        }

        // Cluster name must have been set on the command line, in the
        // environment, or in the config file
        if config.cluster_name.is_empty() {
            return Err(ClusterError::ClusterNameRequired);
        }

        // Expanded exactly once, after all other merging
        config.existing_cluster_kubeconfig =
            sanitize_kubeconfig_path(&config.existing_cluster_kubeconfig)?;

        Ok(config)
    }

    fn set_field(
        &self,
        config: &mut ClusterConfig,
        field: &FieldSpec,
        args: &ArgMap,
    ) -> ClusterResult<()> {
        match field.kind {
            FieldKind::Bool(get) => self.set_bool(config, field.name, get, args),
            FieldKind::String(get) => self.set_string(config, field.name, get, args),
            FieldKind::StringList(get) => self.set_string_list(config, field.name, get, args),
            FieldKind::PortMappingList(get) => {
                self.set_port_mapping_list(config, field.name, get, args)
            }
            FieldKind::InstallPackageList(get) => {
                self.set_install_package_list(config, field.name, get, args)
            }
        }
    }

    fn set_string(
        &self,
        config: &mut ClusterConfig,
        name: &'static str,
        get: fn(&mut ClusterConfig) -> &mut String,
        args: &ArgMap,
    ) -> ClusterResult<()> {
        match args.get(name) {
            Some(ArgValue::String(value)) if !value.is_empty() => {
                *get(config) = value.clone();
            }
            Some(ArgValue::String(_)) | None => {
                if let Some(value) = non_empty_env(name) {
                    *get(config) = value;
                }
            }
            Some(_) => return Err(argument_type_error(name, "string")),
        }

        // Defaults have final say only when nothing populated the field
        if get(config).is_empty() {
            if let Some(value) = self.defaults.string_for(name) {
                *get(config) = value.to_string();
            }
        }

        Ok(())
    }

    fn set_bool(
        &self,
        config: &mut ClusterConfig,
        name: &'static str,
        get: fn(&mut ClusterConfig) -> &mut bool,
        args: &ArgMap,
    ) -> ClusterResult<()> {
        let mut explicit = false;
        match args.get(name) {
            Some(ArgValue::Bool(value)) => {
                *get(config) = *value;
                explicit = true;
            }
            None => {
                if let Some(raw) = non_empty_env(name) {
                    *get(config) = parse_bool_permissive(name, &raw);
                    explicit = true;
                }
            }
            Some(_) => return Err(argument_type_error(name, "bool")),
        }

        // A false with no explicit source is indistinguishable from unset
        if !explicit && !*get(config) {
            if let Some(value) = self.defaults.bool_for(name) {
                *get(config) = value;
            }
        }

        Ok(())
    }

    fn set_string_list(
        &self,
        config: &mut ClusterConfig,
        name: &'static str,
        get: fn(&mut ClusterConfig) -> &mut Vec<String>,
        args: &ArgMap,
    ) -> ClusterResult<()> {
        match args.get(name) {
            Some(ArgValue::StringList(values)) if !values.is_empty() => {
                *get(config) = values.clone();
            }
            Some(ArgValue::StringList(_)) | None => {
                if let Some(raw) = non_empty_env(name) {
                    *get(config) = raw.split(',').map(str::to_string).collect();
                }
            }
            Some(_) => return Err(argument_type_error(name, "string list")),
        }

        if get(config).is_empty() {
            if let Some(values) = self.defaults.list_for(name) {
                *get(config) = values.iter().map(|v| v.to_string()).collect();
            }
        }

        Ok(())
    }

    fn set_port_mapping_list(
        &self,
        config: &mut ClusterConfig,
        name: &'static str,
        get: fn(&mut ClusterConfig) -> &mut Vec<PortMapping>,
        args: &ArgMap,
    ) -> ClusterResult<()> {
        match args.get(name) {
            Some(ArgValue::PortMappingList(values)) if !values.is_empty() => {
                *get(config) = values.clone();
            }
            Some(ArgValue::PortMappingList(_)) | None => {
                if let Some(raw) = non_empty_env(name) {
                    let items: Vec<String> = raw.split(',').map(str::to_string).collect();
                    match parse_port_mappings(&items) {
                        Ok(mappings) => *get(config) = mappings,
                        Err(err) => warn!(
                            "ignoring environment variable {}: {err}",
                            field_name_to_env_name(name)
                        ),
                    }
                }
            }
            Some(_) => return Err(argument_type_error(name, "port mapping list")),
        }

        Ok(())
    }

    fn set_install_package_list(
        &self,
        config: &mut ClusterConfig,
        name: &'static str,
        get: fn(&mut ClusterConfig) -> &mut Vec<InstallPackageMapping>,
        args: &ArgMap,
    ) -> ClusterResult<()> {
        match args.get(name) {
            Some(ArgValue::InstallPackageList(values)) if !values.is_empty() => {
                *get(config) = values.clone();
            }
            Some(ArgValue::InstallPackageList(_)) | None => {
                if let Some(raw) = non_empty_env(name) {
                    match parse_install_package_mappings(&[raw]) {
                        Ok(mappings) => *get(config) = mappings,
                        Err(err) => warn!(
                            "ignoring environment variable {}: {err}",
                            field_name_to_env_name(name)
                        ),
                    }
                }
            }
            Some(_) => return Err(argument_type_error(name, "install package list")),
        }

        Ok(())
    }
}

/// Determine the configuration to use for cluster creation using the
/// built-in default table.
pub fn initialize_configuration(args: &ArgMap) -> ClusterResult<ClusterConfig> {
    Resolver::new(DefaultValues::default()).resolve(args)
}

/// Derive the environment variable name for a canonical field name.
///
/// The name is split into maximal runs starting with an uppercase letter,
/// each run is upper-cased, and the runs are joined with `_` under the
/// `TANZU` namespace: `PodCidr` becomes `TANZU_POD_CIDR`. Characters before
/// the first uppercase letter are not emitted.
pub fn field_name_to_env_name(field: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for ch in field.chars() {
        if ch.is_ascii_uppercase() {
            words.push(ch.to_string());
        } else if let Some(current) = words.last_mut() {
            current.push(ch);
        }
    }

    let mut parts = vec!["TANZU".to_string()];
    parts.extend(words.into_iter().map(|w| w.to_uppercase()));
    parts.join("_")
}

fn argument_type_error(name: &str, expected: &'static str) -> ClusterError {
    ClusterError::ArgumentType {
        name: name.to_string(),
        expected,
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(field_name_to_env_name(name))
        .ok()
        .filter(|value| !value.is_empty())
}

/// Permissive boolean parsing for environment values: the `strconv`-style
/// token set, with anything unparseable coercing to `false`.
fn parse_bool_permissive(name: &str, raw: &str) -> bool {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
        "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
        other => {
            warn!(
                "ignoring unparseable boolean value '{other}' in {}",
                field_name_to_env_name(name)
            );
            false
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
fn sanitize_kubeconfig_path(path: &str) -> ClusterResult<String> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = loader::tanzu_home_dir().ok_or(ClusterError::HomeDirNotFound)?;
        return Ok(home.join(rest).to_string_lossy().into_owned());
    }

    Ok(path.to_string())
}
