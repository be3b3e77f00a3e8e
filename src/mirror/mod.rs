//! Local mirror of the remote note collection.
//!
//! Each note is stored as a pair of files keyed by its `created` timestamp:
//!
//! ```text
//! data/1467826537000.json   projection - small derived record for freshness checks
//! data/1467826537000.note   raw snapshot - the full remote note, resources included
//! ```
//!
//! The projection's `updated` field certifies freshness: when it matches the
//! remote summary the record is current and the full note is not refetched.
//! A projection that fails to parse is never overwritten in place; it is
//! renamed to a `corrupted--` quarantine name and the record is treated as
//! absent.

use crate::log;
use crate::remote::types::{RemoteNote, Tag};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the raw snapshot half of a record pair.
pub const SNAPSHOT_EXT: &str = "note";

/// Tag cache file name, colocated with the record pairs.
pub const TAG_CACHE_FILENAME: &str = ".tag-cache.json";

/// Derived JSON record for one note. Small enough to read on every sync
/// pass without touching the raw snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub title: String,
    pub guid: String,
    pub created: i64,
    pub updated: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<i64>,
    /// Note markup, base64-encoded.
    pub b64_content: String,
    pub b64_content_hash: String,
    pub content_length: u64,
    /// Resolved tag records, in `tag_guids` order.
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub tag_names: Vec<String>,
    #[serde(default)]
    pub tag_guids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Projection {
    /// Derive a projection from a full note and its resolved tags.
    pub fn from_note(note: &RemoteNote, tags: Vec<Tag>) -> Self {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD;

        Self {
            title: note.title.clone(),
            guid: note.guid.clone(),
            created: note.created,
            updated: note.updated,
            deleted: note.deleted,
            b64_content: STANDARD.encode(note.content.as_bytes()),
            b64_content_hash: STANDARD.encode(&note.content_hash),
            content_length: note.content_length,
            tag_names: tags.iter().map(|t| t.name.clone()).collect(),
            tag_guids: note.tag_guids.clone(),
            tags,
            source_url: note.attributes.source_url.clone(),
        }
    }
}

/// A fully loaded mirror record, ready for rendering.
#[derive(Debug, Clone)]
pub struct MirrorRecord {
    pub projection: Projection,
    pub note: RemoteNote,
    /// Path of the projection file (copied verbatim into `api/`).
    pub projection_path: PathBuf,
}

/// On-disk store of record pairs under a single data directory.
pub struct MirrorStore {
    data_dir: PathBuf,
}

impl MirrorStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn projection_path(&self, created: i64) -> PathBuf {
        self.data_dir.join(format!("{created}.json"))
    }

    pub fn snapshot_path(&self, created: i64) -> PathBuf {
        self.data_dir.join(format!("{created}.{SNAPSHOT_EXT}"))
    }

    pub fn tag_cache_path(&self) -> PathBuf {
        self.data_dir.join(TAG_CACHE_FILENAME)
    }

    /// Both halves of the record pair exist on disk.
    pub fn pair_exists(&self, created: i64) -> bool {
        self.projection_path(created).exists() && self.snapshot_path(created).exists()
    }

    /// Read the projection for `created`, if present.
    ///
    /// A malformed projection is quarantined (renamed, never deleted) and
    /// reported as absent, which forces a refetch on the current pass.
    pub fn read_projection(&self, created: i64) -> Result<Option<Projection>> {
        let path = self.projection_path(created);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        match serde_json::from_str(&content) {
            Ok(projection) => Ok(Some(projection)),
            Err(err) => {
                log!(warn: "mirror"; "malformed projection {}: {err}", path.display());
                self.quarantine(&path)?;
                Ok(None)
            }
        }
    }

    /// Rename a corrupt file out of the way, stamped so repeated
    /// quarantines never clobber each other.
    fn quarantine(&self, path: &Path) -> Result<()> {
        let stamp = chrono::Local::now().format("%Y-%m-%dT%H_%M_%S");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = self.data_dir.join(format!("corrupted--{name}.{stamp}"));
        fs::rename(path, &target)
            .with_context(|| format!("quarantining {}", path.display()))?;
        log!(warn: "mirror"; "quarantined to {}", target.display());
        Ok(())
    }

    /// Persist a record pair. The raw snapshot is written first so that an
    /// interrupted write leaves a missing or stale projection, which the
    /// freshness check treats as "refetch".
    pub fn write_pair(&self, note: &RemoteNote, projection: &Projection) -> Result<()> {
        let snapshot_path = self.snapshot_path(note.created);
        let snapshot =
            serde_json::to_vec(note).context("serializing raw note snapshot")?;
        fs::write(&snapshot_path, snapshot)
            .with_context(|| format!("writing {}", snapshot_path.display()))?;

        let projection_path = self.projection_path(note.created);
        let json = serde_json::to_string(projection).context("serializing projection")?;
        fs::write(&projection_path, json)
            .with_context(|| format!("writing {}", projection_path.display()))?;
        Ok(())
    }

    /// Count record files per side: `(projections, snapshots)`.
    ///
    /// Only numeric-stem files count; quarantined files and the tag cache
    /// are ignored.
    pub fn record_counts(&self) -> Result<(usize, usize)> {
        let mut projections = 0;
        let mut snapshots = 0;
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if !Self::has_numeric_stem(&path) {
                continue;
            }
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => projections += 1,
                Some(SNAPSHOT_EXT) => snapshots += 1,
                _ => {}
            }
        }
        Ok((projections, snapshots))
    }

    /// Load every complete record pair for rendering.
    ///
    /// Pairs whose projection or snapshot fails to parse are quarantined
    /// and skipped; a missing snapshot half is skipped with a warning.
    pub fn load_records(&self) -> Result<Vec<MirrorRecord>> {
        let mut records = Vec::new();
        for entry in walkdir::WalkDir::new(&self.data_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json")
                || !Self::has_numeric_stem(path)
            {
                continue;
            }
            let Some(created) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<i64>().ok())
            else {
                continue;
            };
            let Some(projection) = self.read_projection(created)? else {
                continue;
            };
            let snapshot_path = self.snapshot_path(created);
            let raw = match fs::read(&snapshot_path) {
                Ok(raw) => raw,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    log!(warn: "mirror"; "snapshot missing for created={created}, skipping");
                    continue;
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("reading {}", snapshot_path.display()));
                }
            };
            let note: RemoteNote = match serde_json::from_slice(&raw) {
                Ok(note) => note,
                Err(err) => {
                    log!(warn: "mirror"; "malformed snapshot {}: {err}", snapshot_path.display());
                    self.quarantine(&snapshot_path)?;
                    continue;
                }
            };
            records.push(MirrorRecord {
                projection,
                note,
                projection_path: path.to_path_buf(),
            });
        }
        Ok(records)
    }

    fn has_numeric_stem(path: &Path) -> bool {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
    }
}
