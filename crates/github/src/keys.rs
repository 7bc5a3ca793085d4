//! Webhook key loading
//!
//! Key files are resolved from the webhook configuration, read once at
//! startup and folded into a [`KeyDictionary`]. Any unreadable file aborts the
//! whole load.

use common::config::{DEFAULT_LABEL_FIELD, SECRET_KEY_FILE_FIELD};
use common::{Error, KeyDictionary, KeyFileEntry, Result, DEFAULT_KEY_LABEL};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Label of a builder config: its `branch` field
pub fn branch_label(builder: &Value) -> Option<String> {
    builder[DEFAULT_LABEL_FIELD].as_str().map(str::to_string)
}

/// Label taken from an arbitrary string field of a builder config
pub fn label_field(field: &str) -> impl Fn(&Value) -> Option<String> + '_ {
    move |builder: &Value| builder[field].as_str().map(str::to_string)
}

/// List the key files to load, in the order they must be applied.
///
/// Builders with a `secretKeyFile` come first, in config order; the default
/// key file, if any, is appended last under [`DEFAULT_KEY_LABEL`].
pub fn resolve_key_files<F>(
    default_key_file: Option<&Path>,
    builders: &[Value],
    label_of: F,
) -> Vec<KeyFileEntry>
where
    F: Fn(&Value) -> Option<String>,
{
    let mut entries = Vec::with_capacity(builders.len() + 1);

    for builder in builders {
        let file = match builder[SECRET_KEY_FILE_FIELD].as_str() {
            Some(f) if !f.is_empty() => f,
            _ => continue,
        };

        let Some(label) = label_of(builder) else {
            warn!("Builder with key file {} has no label, skipping", file);
            continue;
        };

        if label == DEFAULT_KEY_LABEL {
            warn!(
                "Builder label {} collides with the default key label",
                label
            );
        }

        entries.push(KeyFileEntry::new(label, file));
    }

    if let Some(file) = default_key_file {
        entries.push(KeyFileEntry::new(DEFAULT_KEY_LABEL, file));
    }

    entries
}

/// Read one key file and pair its trimmed contents with `label`
pub async fn load_key(label: &str, file: &Path) -> Result<(String, String)> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| Error::file_read(file, e))?;

    debug!("Loaded key for {} from {}", label, file.display());
    Ok((label.to_string(), contents.trim().to_string()))
}

/// Load every resolved key file into a single dictionary.
///
/// Files are read in resolution order and the first failure is returned
/// as-is; later files sharing a label replace earlier ones.
pub async fn load_key_dictionary<F>(
    default_key_file: Option<&Path>,
    builders: &[Value],
    label_of: F,
) -> Result<KeyDictionary>
where
    F: Fn(&Value) -> Option<String>,
{
    let entries = resolve_key_files(default_key_file, builders, label_of);

    let mut keys = Vec::with_capacity(entries.len());
    for entry in &entries {
        keys.push(load_key(&entry.label, &entry.file).await?);
    }

    let dictionary: KeyDictionary = keys.into_iter().collect();
    info!(
        "Loaded {} webhook key(s) from {} file(s)",
        dictionary.len(),
        entries.len()
    );
    Ok(dictionary)
}
