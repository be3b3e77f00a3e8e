//! In-memory `NoteSource` fake with call counters, shared by the sync and
//! tag-resolver tests.

use crate::remote::types::{Notebook, NoteSummary, RemoteNote, Tag};
use crate::remote::{NoteSource, RemoteError};
use std::cell::Cell;

/// Scripted remote store. Notes are served in `updated`-descending order,
/// the order the real listing endpoint guarantees.
#[derive(Default)]
pub struct FakeSource {
    notebooks: Vec<Notebook>,
    notes: Vec<RemoteNote>,
    tags: Vec<Tag>,
    /// Tags that `get_tag` knows but `list_tags` omits, to exercise the
    /// eventual-consistency fallback.
    hidden_tags: Vec<Tag>,
    /// When set, `note_count` reports this instead of `notes.len()`.
    count_override: Cell<Option<usize>>,

    find_notes_calls: Cell<usize>,
    get_note_calls: Cell<usize>,
    list_tags_calls: Cell<usize>,
    get_tag_calls: Cell<usize>,
}

impl FakeSource {
    pub fn with_notebooks(mut self, names: &[&str]) -> Self {
        self.notebooks = names
            .iter()
            .enumerate()
            .map(|(i, name)| Notebook {
                guid: format!("nb-{i}"),
                name: (*name).to_string(),
            })
            .collect();
        self
    }

    pub fn with_notes(mut self, notes: Vec<RemoteNote>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_hidden_tag(mut self, tag: Tag) -> Self {
        self.hidden_tags.push(tag);
        self
    }

    pub fn with_count_override(self, count: usize) -> Self {
        self.count_override.set(Some(count));
        self
    }

    pub fn find_notes_calls(&self) -> usize {
        self.find_notes_calls.get()
    }
    pub fn get_note_calls(&self) -> usize {
        self.get_note_calls.get()
    }
    pub fn list_tags_calls(&self) -> usize {
        self.list_tags_calls.get()
    }
    pub fn get_tag_calls(&self) -> usize {
        self.get_tag_calls.get()
    }
}

impl NoteSource for FakeSource {
    fn list_notebooks(&self) -> Result<Vec<Notebook>, RemoteError> {
        Ok(self.notebooks.clone())
    }

    fn find_notes(
        &self,
        _notebook: &Notebook,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<NoteSummary>, RemoteError> {
        self.find_notes_calls.set(self.find_notes_calls.get() + 1);
        let mut sorted: Vec<&RemoteNote> = self.notes.iter().collect();
        sorted.sort_by_key(|n| std::cmp::Reverse(n.updated));
        Ok(sorted
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|n| NoteSummary {
                guid: n.guid.clone(),
                title: n.title.clone(),
                created: n.created,
                updated: n.updated,
            })
            .collect())
    }

    fn get_note(&self, guid: &str) -> Result<RemoteNote, RemoteError> {
        self.get_note_calls.set(self.get_note_calls.get() + 1);
        self.notes
            .iter()
            .find(|n| n.guid == guid)
            .cloned()
            .ok_or_else(|| RemoteError::NoteNotFound(guid.to_string()))
    }

    fn list_tags(&self) -> Result<Vec<Tag>, RemoteError> {
        self.list_tags_calls.set(self.list_tags_calls.get() + 1);
        Ok(self.tags.clone())
    }

    fn get_tag(&self, guid: &str) -> Result<Tag, RemoteError> {
        self.get_tag_calls.set(self.get_tag_calls.get() + 1);
        self.tags
            .iter()
            .chain(&self.hidden_tags)
            .find(|t| t.guid == guid)
            .cloned()
            .ok_or_else(|| RemoteError::TagNotFound(guid.to_string()))
    }

    fn note_count(&self, _notebook: &Notebook) -> Result<usize, RemoteError> {
        Ok(self.count_override.get().unwrap_or(self.notes.len()))
    }
}
