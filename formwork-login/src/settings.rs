//! Loading of the message catalog override.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use formwork::rules::MessageCatalog;
use log::{debug, info};
use thiserror::Error;

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid message catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the catalog at `path`, or the built-in English catalog when the file
/// does not exist. Keys missing from the file keep their defaults.
pub fn load_catalog(path: Option<&Path>) -> Result<MessageCatalog, SettingsError> {
    let Some(path) = path else {
        debug!("No config directory, using default messages");
        return Ok(MessageCatalog::default());
    };

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} not found, using default messages", path.display());
            return Ok(MessageCatalog::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let catalog = serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded message catalog from {}", path.display());
    Ok(catalog)
}
