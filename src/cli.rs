//! Command-line interface definitions
//!
//! The CLI surface exposes only the configuration workflow; mapping strings
//! supplied through flags are parsed here, and a parse failure aborts the
//! run before resolution starts.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{self, ArgMap, ArgValue};
use crate::error::ClusterResult;
use crate::parser::{parse_install_package_mappings, parse_port_mappings};

/// unmanaged-cluster - local Kubernetes cluster configuration
#[derive(Parser, Debug)]
#[command(name = "unmanaged-cluster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the effective cluster configuration and render it to a file
    Configure(ConfigureArgs),
}

/// Flags for the `configure` command, mapping 1:1 onto argument-map entries
#[derive(Args, Debug, Default)]
pub struct ConfigureArgs {
    /// Name of the cluster (may instead come from the config file or
    /// environment)
    pub cluster_name: Option<String>,

    /// Configuration file to layer beneath environment and flags
    #[arg(short = 'f', long = "config")]
    pub config: Option<PathBuf>,

    /// Kubeconfig of an existing cluster to use instead of creating one
    #[arg(long)]
    pub existing_cluster_kubeconfig: Option<String>,

    /// Host OS image to use for Kubernetes nodes
    #[arg(long)]
    pub node_image: Option<String>,

    /// Infrastructure provider to use (kind, minikube, or none)
    #[arg(long)]
    pub provider: Option<String>,

    /// Networking CNI to use in the cluster
    #[arg(short, long)]
    pub cni: Option<String>,

    /// Pod CIDR range to assign pod IP addresses from
    #[arg(long)]
    pub pod_cidr: Option<String>,

    /// Service CIDR range to assign service IP addresses from
    #[arg(long)]
    pub service_cidr: Option<String>,

    /// Location of the Tanzu Kubernetes Release (TKR) data
    #[arg(short, long = "tkr")]
    pub tkr_location: Option<String>,

    /// Extra package repository to install during bootstrapping (repeatable)
    #[arg(long = "additional-package-repo")]
    pub additional_package_repos: Vec<String>,

    /// Port to forward from host to container,
    /// [listenAddress:]containerPort[:hostPort][/protocol] (repeatable)
    #[arg(short = 'p', long = "port-forward")]
    pub port_forwards: Vec<String>,

    /// Package to install during bootstrapping,
    /// name[:version[:config[:namespace]]] (repeatable, comma-separable)
    #[arg(short = 'i', long = "install-package")]
    pub install_packages: Vec<String>,

    /// Number of control plane nodes to deploy
    #[arg(long)]
    pub control_plane_node_count: Option<String>,

    /// Number of worker nodes to deploy
    #[arg(long)]
    pub worker_node_count: Option<String>,

    /// Skip preflight checks before deploying the cluster
    #[arg(long)]
    pub skip_preflight: bool,

    /// Path to write the bootstrap log to
    #[arg(long)]
    pub log_file: Option<String>,
}

impl ConfigureArgs {
    /// Convert parsed flags into the resolver's argument map.
    ///
    /// Mapping strings are parsed eagerly; unlike environment-derived
    /// values, a malformed flag value is fatal.
    pub fn to_arg_map(&self) -> ClusterResult<ArgMap> {
        let mut args = ArgMap::new();

        let strings = [
            (config::CLUSTER_NAME, &self.cluster_name),
            (
                config::EXISTING_CLUSTER_KUBECONFIG,
                &self.existing_cluster_kubeconfig,
            ),
            (config::NODE_IMAGE, &self.node_image),
            (config::PROVIDER, &self.provider),
            (config::CNI, &self.cni),
            (config::POD_CIDR, &self.pod_cidr),
            (config::SERVICE_CIDR, &self.service_cidr),
            (config::TKR_LOCATION, &self.tkr_location),
            (
                config::CONTROL_PLANE_NODE_COUNT,
                &self.control_plane_node_count,
            ),
            (config::WORKER_NODE_COUNT, &self.worker_node_count),
            (config::LOG_FILE, &self.log_file),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                args.insert(name.to_string(), ArgValue::from(value.clone()));
            }
        }

        if let Some(path) = &self.config {
            args.insert(
                config::CLUSTER_CONFIG_FILE.to_string(),
                ArgValue::from(path.display().to_string()),
            );
        }

        if !self.additional_package_repos.is_empty() {
            args.insert(
                config::ADDITIONAL_PACKAGE_REPOS.to_string(),
                ArgValue::from(self.additional_package_repos.clone()),
            );
        }

        if !self.port_forwards.is_empty() {
            args.insert(
                config::PORTS_TO_FORWARD.to_string(),
                ArgValue::from(parse_port_mappings(&self.port_forwards)?),
            );
        }

        if !self.install_packages.is_empty() {
            args.insert(
                config::INSTALL_PACKAGES.to_string(),
                ArgValue::from(parse_install_package_mappings(&self.install_packages)?),
            );
        }

        if self.skip_preflight {
            args.insert(config::SKIP_PREFLIGHT.to_string(), ArgValue::from(true));
        }

        Ok(args)
    }
}
