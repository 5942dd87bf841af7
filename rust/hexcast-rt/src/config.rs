//! Configuration file parsing for `hexcast.toml`.
//!
//! Searches the current directory then its ancestors, falling back to
//! `~/.config/hexcast/hexcast.toml` if no project-level file is found.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "hexcast.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct HexcastConfig {
    #[serde(default)]
    pub casting: CastingConfig,
}

/// Limits applied by the dispatcher and the sandbox world.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CastingConfig {
    /// Radius around the caster within which targets may be affected.
    pub ambit_radius: f64,
    /// Operators evaluated per cast before `EvalTooDeep`.
    pub max_op_count: usize,
    /// Iotas allowed on the stack before `StackOverflow`.
    pub max_stack_depth: usize,
    /// When false, casts are free (media is still tallied in the report).
    pub require_media: bool,
}

impl Default for CastingConfig {
    fn default() -> Self {
        Self {
            ambit_radius: 32.0,
            max_op_count: 1_000_000,
            max_stack_depth: 1024,
            require_media: true,
        }
    }
}

impl HexcastConfig {
    /// Load config from `hexcast.toml`, searching current dir then parents.
    /// Returns `Default` when no file is found.
    pub fn load() -> Self {
        Self::find_and_load()
            .map(|(_path, cfg)| cfg)
            .unwrap_or_default()
    }

    /// Load config and return the path to the config file that was found.
    pub fn load_with_path() -> Option<(PathBuf, Self)> {
        Self::find_and_load()
    }

    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a TOML string directly (useful for testing and embedding).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    fn find_and_load() -> Option<(PathBuf, Self)> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load_logged(config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        let global = home_dir()?
            .join(".config")
            .join("hexcast")
            .join(CONFIG_FILE_NAME);
        if global.exists() {
            return Self::load_logged(global);
        }
        None
    }

    fn load_logged(path: PathBuf) -> Option<(PathBuf, Self)> {
        match Self::load_from(&path) {
            Ok(cfg) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some((path, cfg))
            }
            Err(err) => {
                tracing::warn!(%err, "ignoring unreadable config");
                None
            }
        }
    }

    /// Generate a default `hexcast.toml` template.
    pub fn default_template() -> &'static str {
        r#"# Hexcast Configuration

[casting]
# Radius (in blocks) around the caster within which entities can be targeted.
ambit_radius = 32.0

# Operators evaluated in a single cast before it fails with `eval_too_deep`.
max_op_count = 1000000

# Iotas the stack may hold before the cast fails with `stack_overflow`.
max_stack_depth = 1024

# Set to false to cast without paying media.
require_media = true
"#
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
