//! Packing of plugins served by a development server into installable bundles.
//!
//! A plugin is described by its [`PluginManifest`]. The bundler loads the manifest, then loads
//! the scripts of all declared extensions and packs them together with the manifest into a zip
//! archive that can be uploaded to a scene.
//!
//! Failure policy differs between the two steps: if the manifest cannot be loaded, no bundle is
//! produced at all, but an extension script that cannot be loaded is only skipped.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::future::{join_all, try_join_all};
use geocredit_manifest::{ExtensionSource, PluginManifest, MANIFEST_FILE_NAME};

use crate::error::GeocreditError;
use crate::platform::{PlatformService, PlatformServiceImpl};

mod archive;

use archive::ArchiveBuilder;

/// Zip archive with a plugin.
#[derive(Debug, Clone)]
pub struct PluginBundle {
    file_name: String,
    manifest: PluginManifest,
    entries: Vec<String>,
    data: Bytes,
}

impl PluginBundle {
    /// File name of the archive, `{id}-{version}.zip`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Manifest of the bundled plugin.
    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    /// Names of the files in the archive, in the order they were added.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Binary content of the archive.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Writes the archive into the given folder and returns the path of the written file.
    pub fn write_to(&self, folder: impl AsRef<Path>) -> Result<PathBuf, GeocreditError> {
        let path = folder.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.data)?;
        log::debug!("Plugin bundle saved to {path:?}");
        Ok(path)
    }
}

/// Loads plugins from their base urls and packs them into [`PluginBundle`]s.
pub struct PluginBundler<P = PlatformServiceImpl> {
    platform_service: P,
}

impl PluginBundler<PlatformServiceImpl> {
    /// Creates a bundler that loads plugins over HTTP.
    pub fn new() -> Result<Self, GeocreditError> {
        Ok(Self::with_platform_service(PlatformServiceImpl::new()?))
    }
}

impl<P: PlatformService> PluginBundler<P> {
    /// Creates a bundler that loads data with the given service.
    pub fn with_platform_service(platform_service: P) -> Self {
        Self { platform_service }
    }

    /// Loads and parses the manifest of the plugin at `base_url`.
    ///
    /// Returns the parsed manifest together with its raw content.
    pub async fn load_manifest(
        &self,
        base_url: &str,
    ) -> Result<(PluginManifest, Bytes), GeocreditError> {
        let url = PluginManifest::url(base_url);
        log::trace!("Loading plugin manifest from {url}");

        let raw = self.platform_service.load_bytes_from_url(&url).await?;
        let manifest = PluginManifest::from_slice(&raw)?;

        Ok((manifest, raw))
    }

    /// Creates a bundle of the plugin at `base_url`.
    ///
    /// Returns `None` if the manifest cannot be loaded or the archive cannot be created. The
    /// reason is logged.
    pub async fn bundle(&self, base_url: &str) -> Option<PluginBundle> {
        match self.try_bundle(base_url).await {
            Ok(bundle) => Some(bundle),
            Err(err) => {
                log::warn!("Failed to bundle plugin from {base_url}: {err}");
                None
            }
        }
    }

    /// Creates a bundle of the plugin at `base_url`.
    ///
    /// Extension scripts are loaded concurrently. Scripts that fail to load are left out of the
    /// bundle, any other failure is returned as an error.
    pub async fn try_bundle(&self, base_url: &str) -> Result<PluginBundle, GeocreditError> {
        let (manifest, raw_manifest) = self.load_manifest(base_url).await?;
        let sources = manifest.extension_sources(base_url).ok_or_else(|| {
            GeocreditError::Generic(format!("plugin {} declares no extensions", manifest.id))
        })?;

        let scripts = join_all(sources.iter().map(|source| self.load_script(source))).await;

        let mut archive = ArchiveBuilder::new();
        for (name, content) in scripts.into_iter().flatten() {
            if archive.contains(&name) {
                log::warn!("Duplicate file {name} in plugin {}, skipping", manifest.id);
                continue;
            }

            archive.add_file(&name, &content)?;
        }
        archive.add_file(MANIFEST_FILE_NAME, &raw_manifest)?;

        let (entries, data) = archive.finish()?;
        let file_name = manifest.bundle_file_name();
        log::info!(
            "Bundled plugin {file_name} with {} files ({} bytes)",
            entries.len(),
            data.len()
        );

        Ok(PluginBundle {
            file_name,
            manifest,
            entries,
            data,
        })
    }

    /// Lists the extensions of the plugins served at the given base urls.
    ///
    /// Fails if any of the manifests cannot be loaded.
    pub async fn dev_extensions(
        &self,
        base_urls: &[impl AsRef<str>],
    ) -> Result<Vec<ExtensionSource>, GeocreditError> {
        let per_plugin = try_join_all(base_urls.iter().map(|base_url| async move {
            let base_url = base_url.as_ref();
            let (manifest, _) = self.load_manifest(base_url).await?;
            Ok::<_, GeocreditError>(manifest.extension_sources(base_url).unwrap_or_default())
        }))
        .await?;

        Ok(per_plugin.into_iter().flatten().collect())
    }

    async fn load_script(&self, source: &ExtensionSource) -> Option<(String, Bytes)> {
        let Some(name) = file_name(&source.url) else {
            log::warn!("Cannot determine file name of {}", source.url);
            return None;
        };

        match self.platform_service.load_bytes_from_url(&source.url).await {
            Ok(content) => {
                log::trace!("Loaded extension {} from {}", source.id, source.url);
                Some((name.to_owned(), content))
            }
            Err(err) => {
                log::warn!("Failed to fetch {}: {err}", source.url);
                None
            }
        }
    }
}

fn file_name(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}
