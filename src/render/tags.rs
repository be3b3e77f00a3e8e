//! Tag index building: grouping notes by normalized tag name and deriving
//! the alphabetical and frequency orderings.

use super::note::RenderedNote;
use crate::remote::types::Tag;
use deunicode::deunicode;
use std::collections::HashMap;

/// Requested ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// One tag with the notes carrying it, newest first.
pub struct TagGroup<'a> {
    /// Tag metadata from the first note encountered with this tag.
    pub tag: Tag,
    /// Normalized name: lowercased and transliterated to plain ASCII.
    /// Used as the grouping key and the tag page filename.
    pub name: String,
    pub notes: Vec<&'a RenderedNote>,
}

/// Notes grouped by normalized tag name.
pub struct TagIndex<'a> {
    groups: Vec<TagGroup<'a>>,
}

/// Lowercase and transliterate a tag name to a plain-text-safe form.
pub fn normalize_tag_name(name: &str) -> String {
    deunicode(&name.to_lowercase())
}

impl<'a> TagIndex<'a> {
    /// Group the full note collection by tag. Within each group, notes are
    /// ordered by creation time descending.
    pub fn build(notes: &'a [RenderedNote]) -> Self {
        let mut by_name: HashMap<String, TagGroup<'a>> = HashMap::new();

        for note in notes {
            for tag in &note.tags {
                let name = normalize_tag_name(&tag.name);
                let group = by_name.entry(name.clone()).or_insert_with(|| TagGroup {
                    tag: tag.clone(),
                    name,
                    notes: Vec::new(),
                });
                group.notes.push(note);
            }
        }

        let mut groups: Vec<TagGroup<'a>> = by_name.into_values().collect();
        for group in &mut groups {
            group.notes.sort_by_key(|n| std::cmp::Reverse(n.created()));
        }
        // Canonical order: alphabetical ascending.
        groups.sort_by(|a, b| a.name.cmp(&b.name));

        Self { groups }
    }

    /// All groups in alphabetical ascending order.
    pub fn groups(&self) -> &[TagGroup<'a>] {
        &self.groups
    }

    /// Groups ordered alphabetically by normalized name.
    pub fn by_name(&self, order: Order) -> Vec<&TagGroup<'a>> {
        let mut out: Vec<&TagGroup<'a>> = self.groups.iter().collect();
        if order == Order::Desc {
            out.reverse();
        }
        out
    }

    /// Groups ordered by note count, alphabetical within equal counts.
    ///
    /// Groups start alphabetically sorted, so the stable frequency sort
    /// keeps equal-count runs alphabetical in both directions.
    pub fn by_frequency(&self, order: Order) -> Vec<&TagGroup<'a>> {
        let mut out: Vec<&TagGroup<'a>> = self.groups.iter().collect();
        match order {
            Order::Asc => out.sort_by(|a, b| a.notes.len().cmp(&b.notes.len())),
            Order::Desc => out.sort_by(|a, b| b.notes.len().cmp(&a.notes.len())),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::{MirrorRecord, Projection};
    use crate::remote::types::{NoteAttributes, RemoteNote};
    use std::path::PathBuf;

    fn tag(name: &str) -> Tag {
        Tag {
            guid: format!("t-{name}"),
            name: name.into(),
            parent_guid: None,
            update_sequence_num: 1,
        }
    }

    fn rendered(created: i64, tag_names: &[&str]) -> RenderedNote {
        let tags: Vec<Tag> = tag_names.iter().map(|n| tag(n)).collect();
        let note = RemoteNote {
            guid: format!("n-{created}"),
            title: format!("note {created}"),
            created,
            updated: created,
            deleted: None,
            content: "<en-note/>".into(),
            content_hash: vec![],
            content_length: 10,
            tag_guids: tags.iter().map(|t| t.guid.clone()).collect(),
            attributes: NoteAttributes::default(),
            resources: vec![],
        };
        let projection = Projection::from_note(&note, tags);
        RenderedNote::build(
            MirrorRecord {
                projection,
                note,
                projection_path: PathBuf::from(format!("data/{created}.json")),
            },
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_normalization_lowercases_and_transliterates() {
        assert_eq!(normalize_tag_name("Café"), "cafe");
        assert_eq!(normalize_tag_name("RUST"), "rust");
        assert_eq!(normalize_tag_name("日本"), "ri ben");
    }

    #[test]
    fn test_groups_merge_case_variants() {
        let notes = vec![rendered(1, &["Rust"]), rendered(2, &["rust"])];
        let index = TagIndex::build(&notes);
        assert_eq!(index.groups().len(), 1);
        assert_eq!(index.groups()[0].notes.len(), 2);
    }

    #[test]
    fn test_group_notes_newest_first() {
        let notes = vec![rendered(1, &["a"]), rendered(3, &["a"]), rendered(2, &["a"])];
        let index = TagIndex::build(&notes);
        let created: Vec<i64> = index.groups()[0].notes.iter().map(|n| n.created()).collect();
        assert_eq!(created, vec![3, 2, 1]);
    }

    #[test]
    fn test_by_name_orders() {
        let notes = vec![rendered(1, &["beta", "alpha", "gamma"])];
        let index = TagIndex::build(&notes);

        let asc: Vec<&str> = index.by_name(Order::Asc).iter().map(|g| g.name.as_str()).collect();
        assert_eq!(asc, vec!["alpha", "beta", "gamma"]);

        let desc: Vec<&str> = index.by_name(Order::Desc).iter().map(|g| g.name.as_str()).collect();
        assert_eq!(desc, vec!["gamma", "beta", "alpha"]);
    }

    #[test]
    fn test_frequency_desc_with_alphabetical_tiebreak() {
        let notes = vec![
            rendered(1, &["common", "zeta", "eta"]),
            rendered(2, &["common", "zeta"]),
            rendered(3, &["common"]),
        ];
        let index = TagIndex::build(&notes);
        let desc = index.by_frequency(Order::Desc);

        let counts: Vec<usize> = desc.iter().map(|g| g.notes.len()).collect();
        assert_eq!(counts, vec![3, 2, 1]);

        // Non-increasing counts; equal counts alphabetical.
        for pair in desc.windows(2) {
            assert!(pair[0].notes.len() >= pair[1].notes.len());
            if pair[0].notes.len() == pair[1].notes.len() {
                assert!(pair[0].name <= pair[1].name);
            }
        }

        let asc = index.by_frequency(Order::Asc);
        let counts: Vec<usize> = asc.iter().map(|g| g.notes.len()).collect();
        assert_eq!(counts, vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_frequency_groups_stay_alphabetical() {
        let notes = vec![rendered(1, &["delta", "bravo", "alpha", "charlie"])];
        let index = TagIndex::build(&notes);
        let desc = index.by_frequency(Order::Desc);
        let names: Vec<&str> = desc.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "bravo", "charlie", "delta"]);
    }
}
