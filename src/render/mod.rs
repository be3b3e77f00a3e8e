//! Static site generation from the local mirror.
//!
//! # Flow
//!
//! ```text
//! Generator
//!     │
//!     ├── load_notes()        read record pairs, drop deleted, sort newest first
//!     │
//!     ├── generate()          full rebuild:
//!     │       ├── api/<id>.json        projection copies
//!     │       ├── index.html           chronological index
//!     │       ├── node/<id>.html       detail pages (+ asset materialization)
//!     │       └── tag pages            via make_tags()
//!     │
//!     └── generate_indices()  tag pages only, nothing else touched
//! ```
//!
//! Output is a pure function of the mirror: a failed run leaves a partially
//! overwritten tree that the next run simply overwrites again.

pub mod clean;
pub mod html;
pub mod note;
pub mod tags;

use crate::config::AppConfig;
use crate::error::FatalError;
use crate::log;
use crate::mirror::MirrorStore;
use anyhow::{Context, Result, bail};
use note::RenderedNote;
use std::fs;
use std::path::{Path, PathBuf};
use tags::{Order, TagIndex};

/// Environment variable restricting a full render to one note id.
pub const ONLY_NOTE_ID_VAR: &str = "ONLY_NOTE_ID";

/// Read the single-note scope from the environment.
pub fn scope_from_env() -> Option<String> {
    std::env::var(ONLY_NOTE_ID_VAR).ok().filter(|v| !v.is_empty())
}

/// Drives template rendering and output materialization.
pub struct Generator<'a> {
    config: &'a AppConfig,
    output: PathBuf,
    /// When set, api/node output is restricted to ids containing this value.
    scope: Option<String>,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            output: config.output_dir().to_path_buf(),
            scope: None,
        }
    }

    /// Restrict api/node output to note ids containing `scope`. Indices
    /// are always rebuilt from the complete collection.
    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    /// Full rebuild of the output tree.
    pub fn generate(&self) -> Result<()> {
        for dir in ["api", "node", "tag", "assets"] {
            fs::create_dir_all(self.output.join(dir))
                .with_context(|| format!("creating output directory {dir}"))?;
        }

        let notes = self.load_notes(false)?;
        log!("render"; "{} notes loaded", notes.len());

        for note in notes.iter().filter(|n| self.in_scope(n)) {
            let api_path = self.output.join("api").join(format!("{}.json", note.id));
            fs::copy(note.projection_path(), &api_path)
                .with_context(|| format!("copying projection for note {}", note.id))?;
        }

        self.write(
            &self.output.join("index.html"),
            &html::note_index(&self.config.site, &notes),
        )?;

        for note in notes.iter().filter(|n| self.in_scope(n)) {
            self.write(
                &self.output.join("node").join(format!("{}.html", note.id)),
                &html::note_page(&self.config.site, note),
            )?;
            self.dump_assets(note)?;
        }

        self.make_tags(&notes)?;
        log!("render"; "site written to {}", self.output.display());
        Ok(())
    }

    /// Regenerate only the tag index pages.
    pub fn generate_indices(&self) -> Result<()> {
        if self.scope.is_some() {
            bail!(FatalError::IndicesOnlyWithScopedRender);
        }
        fs::create_dir_all(self.output.join("tag")).context("creating output directory tag")?;

        let notes = self.load_notes(true)?;
        self.make_tags(&notes)?;
        log!("render"; "tag indices rebuilt");
        Ok(())
    }

    /// Load all non-deleted notes, newest first.
    fn load_notes(&self, indices_only: bool) -> Result<Vec<RenderedNote>> {
        let store = MirrorStore::open(self.config.data_dir())?;
        let mut notes = store
            .load_records()?
            .into_iter()
            .map(|record| RenderedNote::build(record, indices_only))
            .collect::<Result<Vec<_>>>()?;
        notes.retain(|n| !n.is_deleted());
        notes.sort_by_key(|n| std::cmp::Reverse(n.created()));
        Ok(notes)
    }

    fn in_scope(&self, note: &RenderedNote) -> bool {
        match &self.scope {
            Some(scope) => note.id.contains(scope.as_str()),
            None => true,
        }
    }

    /// Write the per-tag pages and all four ordering variants.
    fn make_tags(&self, notes: &[RenderedNote]) -> Result<()> {
        let index = TagIndex::build(notes);

        for group in index.groups() {
            self.write(
                &self.output.join("tag").join(format!("{}.html", group.name)),
                &html::tag_page(&self.config.site, group),
            )?;
        }

        let variants: [(&str, &str, Vec<&tags::TagGroup>); 4] = [
            ("tag/index.html", "tags", index.by_name(Order::Asc)),
            ("tag/by-tag-desc.html", "tags, reversed", index.by_name(Order::Desc)),
            (
                "tag/by-frequency-asc.html",
                "tags by frequency",
                index.by_frequency(Order::Asc),
            ),
            (
                "tag/by-frequency-desc.html",
                "tags by frequency",
                index.by_frequency(Order::Desc),
            ),
        ];
        for (path, heading, groups) in variants {
            self.write(
                &self.output.join(path),
                &html::tag_index(&self.config.site, heading, &groups),
            )?;
        }
        Ok(())
    }

    /// Materialize the binary attachment bodies of one note.
    fn dump_assets(&self, note: &RenderedNote) -> Result<()> {
        for asset in &note.assets {
            let path = self.output.join("assets").join(&asset.filename);
            fs::write(&path, &note.resource(asset.resource_index).body)
                .with_context(|| format!("writing asset {}", asset.filename))?;
        }
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }
}
