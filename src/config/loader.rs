//! Configuration loading and persistence
//!
//! Encodes and decodes `ClusterConfig` to its canonical on-disk YAML
//! representation, and resolves the configuration directory chain
//! (`<home>/.config/tanzu/tkg/unmanaged`).

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{ClusterError, ClusterResult};

use super::types::{self, ClusterConfig};

const CONFIG_DIR: &str = ".config";
const TANZU_CONFIG_DIR: &str = "tanzu";
const TKG_CONFIG_DIR: &str = "tkg";
const UNMANAGED_CONFIG_DIR: &str = "unmanaged";

/// Environment variable for test isolation of the home directory.
///
/// When set, this overrides `dirs::home_dir()` for every path the engine
/// derives from the user's home. On Windows, `dirs::home_dir()` uses system
/// APIs that ignore `HOME`/`USERPROFILE`, so tests rely on this override.
pub const TANZU_TEST_HOME_VAR: &str = "TANZU_TEST_HOME";

/// Home directory used for all derived paths, honoring the test override.
pub fn tanzu_home_dir() -> Option<PathBuf> {
    std::env::var(TANZU_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// Filepath to the tanzu config directory, e.g. `~/.config/tanzu`.
///
/// Returns an error if the user home directory cannot be resolved.
pub fn tanzu_config_path() -> ClusterResult<PathBuf> {
    let home = tanzu_home_dir().ok_or(ClusterError::HomeDirNotFound)?;
    Ok(home.join(CONFIG_DIR).join(TANZU_CONFIG_DIR))
}

/// Filepath to the tanzu TKG config directory, e.g. `~/.config/tanzu/tkg`.
pub fn tanzu_tkg_config_path() -> ClusterResult<PathBuf> {
    Ok(tanzu_config_path()?.join(TKG_CONFIG_DIR))
}

/// Filepath to the unmanaged-cluster config directory,
/// e.g. `~/.config/tanzu/tkg/unmanaged`.
pub fn unmanaged_config_path() -> ClusterResult<PathBuf> {
    Ok(tanzu_tkg_config_path()?.join(UNMANAGED_CONFIG_DIR))
}

/// Full path to the persisted configuration file for a cluster,
/// `<unmanaged config dir>/<cluster-name>.yaml`.
pub fn cluster_config_path(cluster_name: &str) -> ClusterResult<PathBuf> {
    Ok(unmanaged_config_path()?.join(format!("{cluster_name}.yaml")))
}

/// Non-fatal warning produced while loading a config file (unknown keys).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load a configuration file and collect non-fatal warnings.
///
/// Unknown keys are tolerated for forward compatibility; each one yields a
/// warning carrying the key, its line, and a close canonical name when one
/// exists.
pub fn load_with_warnings(path: &Path) -> ClusterResult<(ClusterConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = serde_yaml_ng::Deserializer::from_str(&content);

    let config: ClusterConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ClusterError::InvalidConfigFile {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Read configuration from a file.
///
/// Returns an error if the file does not exist or does not deserialize onto
/// the schema; unknown keys are logged, not fatal.
pub fn render_file_to_config(path: &Path) -> ClusterResult<ClusterConfig> {
    let (config, warnings) = load_with_warnings(path)?;

    for warning in &warnings {
        match &warning.suggestion {
            Some(suggestion) => warn!(
                "unknown configuration key '{}' in {} (did you mean '{suggestion}'?)",
                warning.key,
                warning.file.display()
            ),
            None => warn!(
                "unknown configuration key '{}' in {}",
                warning.key,
                warning.file.display()
            ),
        }
    }

    Ok(config)
}

/// Serialize configuration data to a file.
///
/// The path must not exist; an existing file is a precondition failure so a
/// previously generated configuration is never clobbered.
pub fn render_config_to_file(path: &Path, config: &ClusterConfig) -> ClusterResult<()> {
    if path.exists() {
        return Err(ClusterError::ConfigFileExists {
            path: path.to_path_buf(),
        });
    }

    let rendered = serde_yaml_ng::to_string(config)?;
    fs::write(path, rendered)?;

    Ok(())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        types::CLUSTER_NAME,
        types::KUBECONFIG_PATH,
        types::EXISTING_CLUSTER_KUBECONFIG,
        types::NODE_IMAGE,
        types::PROVIDER,
        "ProviderConfiguration",
        types::CNI,
        "CniConfiguration",
        types::POD_CIDR,
        types::SERVICE_CIDR,
        types::TKR_LOCATION,
        types::ADDITIONAL_PACKAGE_REPOS,
        types::PORTS_TO_FORWARD,
        types::INSTALL_PACKAGES,
        types::SKIP_PREFLIGHT,
        types::CONTROL_PLANE_NODE_COUNT,
        types::WORKER_NODE_COUNT,
        types::LOG_FILE,
        types::TTY,
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}

#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    // Serializes tests that mutate TANZU_* environment variables, since the
    // process environment is shared across test threads
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PortMapping, Protocol};
    use tempfile::tempdir;

    #[test]
    fn test_config_path_chain() {
        let _guard = env_lock();
        std::env::set_var(TANZU_TEST_HOME_VAR, "/home/test");

        assert_eq!(
            tanzu_config_path().unwrap(),
            PathBuf::from("/home/test/.config/tanzu")
        );
        assert_eq!(
            tanzu_tkg_config_path().unwrap(),
            PathBuf::from("/home/test/.config/tanzu/tkg")
        );
        assert_eq!(
            unmanaged_config_path().unwrap(),
            PathBuf::from("/home/test/.config/tanzu/tkg/unmanaged")
        );
        assert_eq!(
            cluster_config_path("dev").unwrap(),
            PathBuf::from("/home/test/.config/tanzu/tkg/unmanaged/dev.yaml")
        );

        std::env::remove_var(TANZU_TEST_HOME_VAR);
    }

    #[test]
    fn test_render_config_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dev.yaml");

        let config = ClusterConfig {
            cluster_name: "dev".to_string(),
            provider: "kind".to_string(),
            pod_cidr: "10.244.0.0/16".to_string(),
            additional_package_repos: vec!["repo-a".to_string(), "repo-b".to_string()],
            ports_to_forward: vec![PortMapping {
                listen_address: Some("127.0.0.1".to_string()),
                container_port: 80,
                host_port: 8080,
                protocol: Some(Protocol::Tcp),
            }],
            tty: true,
            ..ClusterConfig::default()
        };

        render_config_to_file(&path, &config).unwrap();
        let decoded = render_file_to_config(&path).unwrap();

        assert_eq!(decoded, config);
    }

    #[test]
    fn test_render_config_refuses_existing_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dev.yaml");
        fs::write(&path, "ClusterName: already-here\n").unwrap();

        let config = ClusterConfig {
            cluster_name: "dev".to_string(),
            ..ClusterConfig::default()
        };

        let err = render_config_to_file(&path, &config).unwrap_err();
        assert!(matches!(err, ClusterError::ConfigFileExists { .. }));

        // The original content was not clobbered
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("already-here"));
    }

    #[test]
    fn test_render_uses_two_space_indentation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dev.yaml");

        let mut provider_configuration = std::collections::BTreeMap::new();
        provider_configuration.insert(
            "rawKindConfig".to_string(),
            serde_yaml_ng::Value::from("some-config"),
        );

        let config = ClusterConfig {
            cluster_name: "dev".to_string(),
            additional_package_repos: vec!["repo-a".to_string()],
            provider_configuration,
            ..ClusterConfig::default()
        };

        render_config_to_file(&path, &config).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(content.contains("ProviderConfiguration:\n  rawKindConfig: some-config\n"));
        assert!(content.contains("AdditionalPackageRepos:\n- repo-a\n"));
        assert!(!content.contains('\t'));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        assert!(render_file_to_config(&missing).is_err());
    }

    #[test]
    fn test_load_malformed_yaml_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "ClusterName: [unclosed\n").unwrap();

        let err = render_file_to_config(&path).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidConfigFile { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_load_with_warnings_reports_unknown_key_with_suggestion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "ClusterName: dev\nPodCidar: 10.0.0.0/16\n").unwrap();

        let (config, warnings) = load_with_warnings(&path).unwrap();

        assert_eq!(config.cluster_name, "dev");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, "PodCidar");
        assert_eq!(warnings[0].line, Some(2));
        assert_eq!(warnings[0].suggestion, Some("PodCidr".to_string()));
    }

    #[test]
    fn test_load_with_warnings_no_suggestion_for_distant_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "ClusterName: dev\nCompletelyUnrelated: 1\n").unwrap();

        let (_config, warnings) = load_with_warnings(&path).unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].suggestion, None);
    }
}
