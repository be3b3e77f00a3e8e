//! The per-note view model used by the page builders.
//!
//! A `RenderedNote` is never persisted: it is recomputed on every render
//! from a mirror record pair, composing the projection, the raw snapshot,
//! and derived fields (normalized content, source domain, search query,
//! asset filenames, tag list with the synthesized source-domain tag).

use super::clean::{self, MediaMarkup};
use crate::mirror::MirrorRecord;
use crate::remote::types::{NoteResource, Tag};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

/// Relative path from a detail page (`node/<id>.html`) to the asset tree.
const ASSETS_REL_PATH: &str = "../assets";

/// One materialized attachment: the resource index paired with its asset
/// filename (`<guid>-<n>.<ext>`).
#[derive(Debug, Clone)]
pub struct AssetRef {
    pub resource_index: usize,
    pub filename: String,
}

/// Read-only view of one note, ready for the page builders.
pub struct RenderedNote {
    record: MirrorRecord,
    /// Stable page id: the `created` timestamp as text.
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Normalized markup (empty in indices-only mode).
    pub content: String,
    /// Resolved tags plus the synthesized source-domain tag.
    pub tags: Vec<Tag>,
    pub urlencoded_query: String,
    pub assets: Vec<AssetRef>,
    /// Pre-serialized projection for layered attribute lookup.
    projection_value: serde_json::Value,
    attributes_value: serde_json::Value,
}

impl RenderedNote {
    /// Build the view model from a record pair.
    ///
    /// `indices_only` skips content normalization entirely, since the tag
    /// indices never show note bodies.
    pub fn build(record: MirrorRecord, indices_only: bool) -> Result<Self> {
        let id = record.projection.created.to_string();
        let created_at = DateTime::from_timestamp_millis(record.projection.created)
            .with_context(|| format!("created timestamp {} out of range", record.projection.created))?;

        let assets = asset_refs(&record.note.resources, &record.note.guid);

        let content = if indices_only {
            String::new()
        } else {
            let decoded = clean::decode_content(&record.projection.b64_content)
                .with_context(|| format!("decoding content of note {}", record.note.guid))?;
            let scrubbed = clean::scrub_styles(&decoded);
            let replacements: Vec<MediaMarkup> = assets
                .iter()
                .map(|asset| media_markup(&record.note.resources[asset.resource_index], asset))
                .collect();
            clean::substitute_media(&scrubbed, &replacements)
        };

        let mut tags = record.projection.tags.clone();
        if let Some(domain) = source_domain(record.projection.source_url.as_deref()) {
            tags.push(source_domain_tag(&domain));
        }

        let tag_names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        let query = format!("{} {}", record.projection.title, tag_names.join(" "));
        let urlencoded_query = urlencoding::encode(&query).into_owned();

        let projection_value =
            serde_json::to_value(&record.projection).context("projection to value")?;
        let attributes_value =
            serde_json::to_value(&record.note.attributes).context("attributes to value")?;

        Ok(Self {
            record,
            id,
            created_at,
            content,
            tags,
            urlencoded_query,
            assets,
            projection_value,
            attributes_value,
        })
    }

    pub fn title(&self) -> &str {
        &self.record.projection.title
    }

    pub fn guid(&self) -> &str {
        &self.record.note.guid
    }

    pub fn created(&self) -> i64 {
        self.record.projection.created
    }

    pub fn is_deleted(&self) -> bool {
        self.record.projection.deleted.is_some()
    }

    pub fn source_url(&self) -> &str {
        self.record.projection.source_url.as_deref().unwrap_or("")
    }

    pub fn source_domain(&self) -> String {
        source_domain(self.record.projection.source_url.as_deref()).unwrap_or_default()
    }

    /// `https?://<domain>/`, empty when the note has no source.
    pub fn source_domain_url(&self) -> String {
        let domain = self.source_domain();
        if domain.is_empty() {
            return String::new();
        }
        let scheme = if self.source_url().to_lowercase().starts_with("https") {
            "https"
        } else {
            "http"
        };
        format!("{scheme}://{domain}/")
    }

    pub fn projection_path(&self) -> &PathBuf {
        &self.record.projection_path
    }

    pub fn resource(&self, index: usize) -> &NoteResource {
        &self.record.note.resources[index]
    }

    /// Layered attribute lookup: computed fields, then projection fields,
    /// then raw-note attributes. A miss at every layer is `None`.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.computed(name)
            .or_else(|| value_as_string(&self.projection_value, name))
            .or_else(|| value_as_string(&self.attributes_value, name))
    }

    fn computed(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "source_domain" => Some(self.source_domain()).filter(|d| !d.is_empty()),
            "source_domain_url" => {
                Some(self.source_domain_url()).filter(|u| !u.is_empty())
            }
            "urlencoded_query" => Some(self.urlencoded_query.clone()),
            _ => None,
        }
    }
}

fn value_as_string(value: &serde_json::Value, name: &str) -> Option<String> {
    match value.get(name)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Pair each resource with its materialized asset filename, in order.
fn asset_refs(resources: &[NoteResource], note_guid: &str) -> Vec<AssetRef> {
    resources
        .iter()
        .enumerate()
        .map(|(i, resource)| {
            // Only a token-shaped subtype may become a file extension; a
            // hostile mime must not smuggle path separators into the
            // asset tree.
            let ext = resource
                .mime
                .split_once('/')
                .map(|(_, subtype)| subtype)
                .filter(|s| {
                    !s.is_empty()
                        && s.bytes()
                            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-'))
                })
                .unwrap_or("dat");
            AssetRef {
                resource_index: i,
                filename: format!("{note_guid}-{i}.{ext}"),
            }
        })
        .collect()
}

fn media_markup(resource: &NoteResource, asset: &AssetRef) -> MediaMarkup {
    let rel_path = format!("{ASSETS_REL_PATH}/{}", asset.filename);
    let filename_lower = asset.filename.to_lowercase();
    if filename_lower.ends_with(".pdf") {
        MediaMarkup::PdfLink {
            rel_path,
            filename: asset.filename.clone(),
        }
    } else if filename_lower.ends_with(".octet-stream") && clean::sniffs_as_svg(&resource.body) {
        MediaMarkup::InlineSvg(String::from_utf8_lossy(&resource.body).into_owned())
    } else {
        MediaMarkup::LinkedImage { rel_path }
    }
}

/// Extract the host part of a source URL: scheme and path stripped.
fn source_domain(source_url: Option<&str>) -> Option<String> {
    let url = source_url?.trim();
    if url.is_empty() {
        return None;
    }
    let rest = url
        .split_once("//")
        .map(|(_, rest)| rest)
        .unwrap_or(url);
    let domain = rest.split('/').next().unwrap_or_default();
    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// The synthesized pseudo-tag carrying the article's source domain.
/// Its guid is derived deterministically so reruns are stable.
fn source_domain_tag(domain: &str) -> Tag {
    Tag {
        guid: Uuid::new_v5(&Uuid::NAMESPACE_DNS, domain.as_bytes()).to_string(),
        name: domain.to_string(),
        parent_guid: None,
        update_sequence_num: -1,
    }
}
