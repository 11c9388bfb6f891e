//! Reader for `reearth.yml` plugin manifests.
//!
//! A plugin is served from a base url that contains the manifest file and one script file per
//! declared extension:
//!
//! ```text
//! {base}/reearth.yml
//! {base}/{extension_id}.js
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::ManifestError;

pub mod error;

/// Name of the manifest file at the root of a plugin.
pub const MANIFEST_FILE_NAME: &str = "reearth.yml";

/// Extension of the script files of plugin extensions.
pub const EXTENSION_SCRIPT_SUFFIX: &str = ".js";

/// Extension of the bundle archive file.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Parsed plugin manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    #[serde(deserialize_with = "scalar_to_string")]
    pub id: String,
    #[serde(deserialize_with = "scalar_to_string")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` when the manifest has no `extensions` key at all, which is different from an empty
    /// list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<ExtensionDescriptor>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    pub id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Location of a single extension script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSource {
    pub id: String,
    pub url: String,
}

impl PluginManifest {
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let manifest: PluginManifest = serde_yaml::from_str(text)?;
        if manifest.id.is_empty() {
            return Err(ManifestError::Invalid("plugin id is empty".into()));
        }

        log::trace!(
            "Parsed manifest of plugin {} v{}",
            manifest.id,
            manifest.version
        );

        Ok(manifest)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        let text = std::str::from_utf8(bytes).map_err(|_| ManifestError::Encoding)?;
        Self::parse(text)
    }

    /// Url of the manifest file of the plugin served at `base_url`.
    pub fn url(base_url: &str) -> String {
        format!("{}/{MANIFEST_FILE_NAME}", trim_base(base_url))
    }

    /// Script urls of the declared extensions, relative to `base_url`.
    ///
    /// Returns `None` if the manifest does not declare extensions.
    pub fn extension_sources(&self, base_url: &str) -> Option<Vec<ExtensionSource>> {
        let base = trim_base(base_url);
        self.extensions.as_ref().map(|extensions| {
            extensions
                .iter()
                .map(|ext| ExtensionSource {
                    id: ext.id.clone(),
                    url: format!("{base}/{}{EXTENSION_SCRIPT_SUFFIX}", ext.id),
                })
                .collect()
        })
    }

    /// File name of the bundle archive: `{id}-{version}.zip`.
    pub fn bundle_file_name(&self) -> String {
        format!("{}-{}.{ARCHIVE_EXTENSION}", self.id, self.version)
    }
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

// Hand-written manifests often use `version: 1` instead of a quoted string.
fn scalar_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(v) => Ok(v),
        Value::Number(v) => Ok(v.to_string()),
        Value::Bool(v) => Ok(v.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar value, got {other:?}"
        ))),
    }
}
