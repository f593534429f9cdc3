//! Mapping-string parsers
//!
//! Handles the compact delimiter-based encodings accepted on the command
//! line and through environment variables:
//! - port forwards: `[listenAddress:]containerPort[:hostPort][/protocol]`
//! - package installs: `name[:version[:config[:namespace]]]`, comma-joined

use crate::error::{ClusterError, ClusterResult};
use crate::models::{InstallPackageMapping, PortMapping, Protocol};

/// Parse a single port-mapping string into a `PortMapping`.
///
/// Supported formats are container port only (`"80"`), container port to
/// host port (`"80:8080"`), and listen address, container port, and host
/// port (`"127.0.0.1:80:8080"`), each optionally suffixed with a protocol
/// (`"80:8080/tcp"`).
pub fn parse_port_mapping(port_mapping: &str) -> ClusterResult<PortMapping> {
    let mut result = PortMapping::default();

    // See if a protocol is provided
    let slash_parts: Vec<&str> = port_mapping.split('/').collect();
    if slash_parts.len() == 2 {
        let protocol = slash_parts[1].to_lowercase();
        result.protocol = Some(Protocol::parse(&protocol).ok_or(
            ClusterError::InvalidProtocol {
                protocol: protocol.clone(),
            },
        )?);
    }

    // Now see if we have container, container:host, or listen:container:host
    let parts: Vec<&str> = slash_parts[0].split(':').collect();
    match parts.len() {
        1 => {
            result.container_port = parse_port(parts[0])?;
        }
        2 => {
            result.container_port = parse_port(parts[0])?;
            result.host_port = parse_port(parts[1])?;
        }
        3 => {
            result.listen_address = Some(parts[0].to_string());
            result.container_port = parse_port(parts[1])?;
            result.host_port = parse_port(parts[2])?;
        }
        _ => {
            return Err(ClusterError::InvalidPortMapping {
                mapping: port_mapping.to_string(),
            });
        }
    }

    Ok(result)
}

/// Parse a sequence of port-mapping strings, short-circuiting on the first
/// failure.
pub fn parse_port_mappings(port_mappings: &[String]) -> ClusterResult<Vec<PortMapping>> {
    port_mappings
        .iter()
        .map(|mapping| parse_port_mapping(mapping))
        .collect()
}

/// Parse install-package mapping strings into `InstallPackageMapping`s.
///
/// Each input string may carry multiple comma-separated mappings; each
/// mapping is colon-delimited with one to four segments populating name,
/// version, config path, and namespace in order. The output is the
/// flattened sequence of all parsed records across all input strings.
pub fn parse_install_package_mappings(
    package_mappings: &[String],
) -> ClusterResult<Vec<InstallPackageMapping>> {
    let mut result = Vec::new();

    for package_mapping in package_mappings {
        for mapping in package_mapping.split(',') {
            result.push(parse_install_package_mapping(mapping)?);
        }
    }

    Ok(result)
}

fn parse_install_package_mapping(mapping: &str) -> ClusterResult<InstallPackageMapping> {
    if mapping.is_empty() {
        return Err(ClusterError::InvalidPackageMapping {
            mapping: mapping.to_string(),
        });
    }

    let parts: Vec<&str> = mapping.split(':').collect();
    if parts.len() > 4 {
        return Err(ClusterError::InvalidPackageMapping {
            mapping: mapping.to_string(),
        });
    }

    let mut result = InstallPackageMapping::new(parts[0]);
    if parts.len() > 1 {
        result.version = parts[1].to_string();
    }
    if parts.len() > 2 {
        result.config = parts[2].to_string();
    }
    if parts.len() > 3 {
        result.namespace = parts[3].to_string();
    }

    Ok(result)
}

fn parse_port(part: &str) -> ClusterResult<u16> {
    part.parse::<u16>().map_err(|_| ClusterError::InvalidPort {
        part: part.to_string(),
    })
}
