use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the cleaner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root used when the path prompt is left empty
    pub default_path: Option<PathBuf>,

    /// Path components (globs, case-insensitive) that are never descended into
    pub exclude_dirs: Vec<String>,

    /// Directory names treated as virtual environments
    pub venv_names: Vec<String>,

    /// Directory names treated as bytecode caches
    pub pycache_names: Vec<String>,

    /// Only count a venv directory when it contains `pyvenv.cfg`
    pub require_pyvenv_cfg: bool,

    /// Default scan depth
    pub max_depth: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_path: None,
            exclude_dirs: vec![
                String::from("AppData"),
                String::from(".git"),
                String::from(".hg"),
                String::from(".svn"),
            ],
            venv_names: vec![String::from("venv")],
            pycache_names: vec![String::from("__pycache__")],
            require_pyvenv_cfg: false,
            max_depth: None,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults if it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file: {}", path.as_ref().display())
        })?;

        Ok(config)
    }

    /// Save config to file, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("venv-cleaner").join("config.toml")
        } else {
            PathBuf::from(".venv-cleaner.toml")
        }
    }

    /// Root to scan when the user gives no path
    pub fn default_root(&self) -> PathBuf {
        self.default_path
            .clone()
            .unwrap_or_else(crate::utils::default_root)
    }
}
