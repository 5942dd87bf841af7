//! Work behind `hexcast init` and `hexcast ops`, kept out of `main` so it can
//! be exercised without a process boundary.

use hexcast_rt::config::{HexcastConfig, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("{} already exists, not overwriting", .0.display())]
    Exists(PathBuf),
    #[error("writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write the default `hexcast.toml` into `dir`. An existing file is left
/// untouched.
pub fn init_config(dir: &Path) -> Result<PathBuf, InitError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(InitError::Exists(path));
    }
    std::fs::write(&path, HexcastConfig::default_template())
        .map_err(|source| InitError::Io {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(path = %path.display(), "wrote default config");
    Ok(path)
}

/// `(name, signature)` rows for the operator listing, in registration order.
pub fn operator_rows() -> Vec<(&'static str, &'static str)> {
    hexcast_ops::registry::signatures().collect()
}
