//! This module contains the manifest document, which lists the front-end asset
//! files expected to ship alongside an artifact, and the check that those
//! files actually exist.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The manifest of an application's front-end assets.
///
/// Fields this library does not understand are preserved in `extra`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Manifest {
    /// The entry point of the front-end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,

    /// The script loaded by the front-end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// A document describing the application in detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,

    #[serde(default)]
    pub icons: Vec<Asset>,

    #[serde(default)]
    pub screenshots: Vec<Asset>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single asset reference in the manifest.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Asset {
    pub src: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Asset {
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        let src = src.into();
        let extra = Map::new();
        Self { src, extra }
    }
}

/// A manifest entry whose file could not be found.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MissingFile {
    /// The manifest entry, such as `script` or `icons[1]`.
    pub id: String,

    /// The path that was probed, empty if the entry was not declared at all.
    pub path: String,

    /// Whether the entry is required for the application to be published.
    pub required: bool,
}

/// A way of checking whether files exist.
pub trait FileProbe {
    /// Returns `true` if a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// A [`FileProbe`] backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Finds the files referenced by `manifest` that do not exist beneath `root`,
/// in manifest order.
///
/// The start page, the script and every icon are required. The details page
/// and the screenshots are optional.
#[must_use]
pub fn find_missing_files(manifest: &Manifest, root: &Path, probe: &dyn FileProbe) -> Vec<MissingFile> {
    let mut entries: Vec<(String, Option<&str>, bool)> = vec![
        ("start_url".into(), manifest.start_url.as_deref(), true),
        ("script".into(), manifest.script.as_deref(), true),
    ];
    if let Some(details) = manifest.details_url.as_deref() {
        entries.push(("details_url".into(), Some(details), false));
    }
    entries.extend(
        manifest
            .icons
            .iter()
            .enumerate()
            .map(|(i, icon)| (format!("icons[{i}]"), Some(icon.src.as_str()), true)),
    );
    entries.extend(
        manifest
            .screenshots
            .iter()
            .enumerate()
            .map(|(i, shot)| (format!("screenshots[{i}]"), Some(shot.src.as_str()), false)),
    );

    entries
        .into_iter()
        .filter_map(|(id, src, required)| {
            let Some(src) = src else {
                return Some(MissingFile {
                    id,
                    path: String::new(),
                    required,
                });
            };
            let path = resolve(root, src);
            if probe.exists(&path) {
                None
            } else {
                log::debug!("Manifest entry `{id}` points at missing file {}", path.display());
                Some(MissingFile {
                    id,
                    path: path.to_string_lossy().into_owned(),
                    required,
                })
            }
        })
        .collect()
}

/// Manifest paths are relative to the application root even when written with
/// a leading slash.
fn resolve(root: &Path, src: &str) -> PathBuf {
    root.join(src.trim_start_matches('/'))
}
