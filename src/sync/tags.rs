//! Tag resolution backed by a persisted guid → tag cache.
//!
//! Lookup policy: in-memory cache first; on a miss, one bulk tag listing
//! repopulates the whole cache; if the guid still is not there (possible
//! under eventual consistency) a direct single-tag fetch fills it in.
//!
//! The cache is loaded once at startup and flushed once by the
//! orchestrator after a successful run, never from a destructor.

use crate::log;
use crate::remote::{NoteSource, RemoteError};
use crate::remote::types::Tag;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// In-memory tag cache with explicit load/flush.
pub struct TagResolver {
    cache: HashMap<String, Tag>,
    path: PathBuf,
}

impl TagResolver {
    /// Load the cache from `path`. A missing or corrupt cache file is
    /// non-fatal: the resolver starts empty and rebuilds as it goes.
    pub fn load(path: PathBuf) -> Self {
        let cache = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, Tag>>(&content) {
                Ok(cache) => {
                    log!("tags"; "tag cache loaded ({} entries)", cache.len());
                    cache
                }
                Err(err) => {
                    log!(warn: "tags"; "tag cache unreadable, starting empty: {err}");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log!("tags"; "no pre-existing tag cache");
                HashMap::new()
            }
            Err(err) => {
                log!(warn: "tags"; "tag cache load failed, starting empty: {err}");
                HashMap::new()
            }
        };
        Self { cache, path }
    }

    /// Resolve a tag guid to its record.
    pub fn resolve(&mut self, source: &dyn NoteSource, guid: &str) -> Result<Tag, RemoteError> {
        if let Some(tag) = self.cache.get(guid) {
            return Ok(tag.clone());
        }

        // One bulk listing repopulates the whole cache.
        log!("tags"; "cache miss for {guid}, fetching full tag list");
        for tag in source.list_tags()? {
            self.cache.insert(tag.guid.clone(), tag);
        }
        if let Some(tag) = self.cache.get(guid) {
            return Ok(tag.clone());
        }

        // Unexpected but possible: the listing lagged behind the note.
        log!(warn: "tags"; "tag {guid} absent from full listing, attempting direct lookup");
        let tag = source.get_tag(guid)?;
        self.cache.insert(tag.guid.clone(), tag.clone());
        Ok(tag)
    }

    /// Resolve every tag guid of a note, preserving order.
    pub fn resolve_all(
        &mut self,
        source: &dyn NoteSource,
        guids: &[String],
    ) -> Result<Vec<Tag>, RemoteError> {
        guids.iter().map(|g| self.resolve(source, g)).collect()
    }

    /// Write the cache to disk.
    ///
    /// Skipped when empty so an aborted run cannot clobber a good cache
    /// with nothing.
    pub fn flush(&self) -> Result<()> {
        if self.cache.is_empty() {
            log!("tags"; "tag cache empty, not persisting");
            return Ok(());
        }
        let json = serde_json::to_string(&self.cache).context("serializing tag cache")?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        log!("tags"; "tag cache persisted ({} entries)", self.cache.len());
        Ok(())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cache.len()
    }
}
