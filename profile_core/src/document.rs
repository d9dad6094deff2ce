//! # Profile Documents
//!
//! Host-side container for a digitized profile: the segment sequence, the
//! optional true lengths maintained by the surrounding form, and metadata.
//! The digitizer never reads or writes documents itself; hosts mirror the
//! store into a document from their change observer and save it when they
//! see fit.
//!
//! Documents are saved as pretty-printed JSON (`.profile.json` by
//! convention).
//!
//! ## Safety features
//!
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **Version validation**: files from a newer schema are refused
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use profile_core::document::{load_document, save_document, ProfileDocument};
//! use profile_core::geometry::Segment;
//!
//! let mut doc = ProfileDocument::new("Drip edge");
//! doc.set_segments(&[Segment::new(0.0, 0.0, 40.0, 0.0)]);
//! save_document(&doc, Path::new("drip-edge.profile.json"))?;
//!
//! let loaded = load_document(Path::new("drip-edge.profile.json"))?;
//! assert_eq!(loaded.segments, doc.segments);
//! # Ok::<(), profile_core::errors::ProfileError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ProfileError, ProfileResult};
use crate::export::{export, ExportOptions, GeometryModel};
use crate::geometry::Segment;

/// Current schema version for profile documents
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A saved profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub meta: DocumentMetadata,

    /// Committed segments in drawing order
    pub segments: Vec<Segment>,

    /// Real-world lengths, index-aligned with `segments`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_lengths: Option<Vec<f64>>,
}

/// Document header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub id: Uuid,

    /// Display name, e.g. the sheet reference
    pub name: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

impl ProfileDocument {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        ProfileDocument {
            meta: DocumentMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                name: name.into(),
                created: now,
                modified: now,
            },
            segments: Vec::new(),
            true_lengths: None,
        }
    }

    /// Mirror a store snapshot into the document.
    pub fn set_segments(&mut self, segments: &[Segment]) {
        self.segments = segments.to_vec();
        self.touch();
    }

    pub fn set_true_lengths(&mut self, lengths: Option<Vec<f64>>) {
        self.true_lengths = lengths;
        self.touch();
    }

    /// Whether the stored true lengths (if any) still line up with the
    /// segments.
    pub fn true_lengths_aligned(&self) -> bool {
        self.true_lengths
            .as_ref()
            .map_or(true, |lengths| lengths.len() == self.segments.len())
    }

    /// Export the document's geometry.
    pub fn geometry(&self, options: &ExportOptions) -> ProfileResult<GeometryModel> {
        export(&self.segments, self.true_lengths.as_deref(), options)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for ProfileDocument {
    fn default() -> Self {
        ProfileDocument::new("Untitled")
    }
}

/// Save a document with atomic write semantics.
///
/// 1. Serialize to JSON
/// 2. Write to `<path>.tmp`
/// 3. fsync
/// 4. Rename over `path`
pub fn save_document(doc: &ProfileDocument, path: &Path) -> ProfileResult<()> {
    let json = serde_json::to_string_pretty(doc).map_err(|e| ProfileError::serialization(e.to_string()))?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let mut tmp_file = File::create(tmp_path).map_err(|e| {
        ProfileError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        ProfileError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        ProfileError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(tmp_path);
        ProfileError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!("saved {} segment(s) to {}", doc.segments.len(), path.display());
    Ok(())
}

/// Load a document and check its schema version.
pub fn load_document(path: &Path) -> ProfileResult<ProfileDocument> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ProfileError::file_error("read", path.display().to_string(), e.to_string()))?;

    let doc: ProfileDocument = serde_json::from_str(&contents).map_err(|e| {
        ProfileError::serialization(format!("Invalid JSON in {}: {}", path.display(), e))
    })?;

    validate_version(&doc.meta.version)?;
    Ok(doc)
}

/// Major versions must match; within 0.x a newer minor is refused too.
fn validate_version(file_version: &str) -> ProfileResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || ProfileError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => Err(mismatch()),
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}
