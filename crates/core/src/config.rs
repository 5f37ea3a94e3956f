//! Configuration for the wrapper commands.
//!
//! Everything the wrappers read from their environment is resolved once
//! into a [`Config`] and passed down explicitly; library code never touches
//! process globals. Site-wide settings (frontend and backend host lists, a
//! fallback queue) come from an optional YAML file.

use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default path of the site configuration file
const DEFAULT_CONFIG_PATH: &str = "/etc/printmux.yml";

/// Default timeout for the IPP reachability probe
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 300;

/// Names the default print queue
pub const PRINTER_VAR: &str = "PRINTER";
/// Carries default `lpr` options to inject ahead of the real arguments
pub const LPROPT_VAR: &str = "LPROPT";
/// Names the submitting user; presence doubles as the notify signal
pub const USER_VAR: &str = "PRINTMUX_USER";
/// Overrides the site configuration file path
pub const CONFIG_PATH_VAR: &str = "PRINTMUX_CONFIG";

/// On-disk site configuration. Every field is optional.
#[derive(Deserialize, Debug, Default)]
pub struct ConfigFile {
    pub frontends: Option<Vec<String>>,
    pub backends: Option<Vec<String>>,
    pub default_queue: Option<String>,
    pub probe_timeout_ms: Option<u64>,
}

/// A resolved snapshot of everything the wrappers need from the outside.
#[derive(Clone, Debug)]
pub struct Config {
    /// Default queue, from the environment or the site file.
    pub default_queue: Option<String>,
    /// Submitting user for `-U` and job notifications.
    pub user: Option<String>,
    /// Raw `LPROPT` contents, injected by the `lpr` wrapper.
    pub lpr_options: Option<String>,
    /// Site CUPS frontend hosts (device URIs pointing here are bounce queues).
    pub frontends: Vec<String>,
    /// Site CUPS backend hosts.
    pub backends: Vec<String>,
    /// Timeout for the IPP reachability probe, in milliseconds.
    pub probe_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_queue: None,
            user: None,
            lpr_options: None,
            frontends: Vec::new(),
            backends: Vec::new(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Reads the process environment and the site configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the site file exists but cannot be read or
    /// parsed. A missing file is not an error.
    pub fn from_env() -> Result<Self> {
        let vars: HashMap<String, String> = env::vars().collect();
        let path = get_config_path(vars.get(CONFIG_PATH_VAR));
        let file = load_config_file(&path)?;
        Ok(Self::assemble(file, &vars))
    }

    /// Combines file settings with an environment snapshot.
    ///
    /// Environment variables win over the file; empty values count as
    /// unset.
    pub fn assemble(file: ConfigFile, vars: &HashMap<String, String>) -> Self {
        let var = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();
        Self {
            default_queue: var(PRINTER_VAR).or(file.default_queue),
            user: var(USER_VAR),
            lpr_options: var(LPROPT_VAR),
            frontends: file.frontends.unwrap_or_default(),
            backends: file.backends.unwrap_or_default(),
            probe_timeout_ms: file.probe_timeout_ms.unwrap_or(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }
}

/// Resolves the site configuration file path.
///
/// Uses the override when given, otherwise the default path. Shell
/// expansions like `~` are resolved.
pub fn get_config_path(path_override: Option<&String>) -> String {
    let path = match path_override {
        Some(path) => path.as_str(),
        None => DEFAULT_CONFIG_PATH,
    };
    shellexpand::tilde(path).to_string()
}

/// Loads the site configuration file, tolerating its absence.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be opened, or contains
/// invalid YAML.
pub fn load_config_file(path: &str) -> Result<ConfigFile> {
    if !Path::new(path).exists() {
        return Ok(ConfigFile::default());
    }

    let reader = File::open(path)
        .map_err(|e| Error::io_error("site config".to_string(), path.to_string(), e))?;

    serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "site config".to_string(),
            path.to_string(),
            e,
        )
    })
}
