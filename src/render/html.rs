//! HTML page builders.
//!
//! Templating is deliberately thin: each page kind is a plain function
//! from data to markup, the way the feed and sitemap documents are built
//! elsewhere in this codebase's lineage. Note content is inserted raw
//! (it is already-normalized markup); everything else is escaped.

use super::note::RenderedNote;
use super::tags::TagGroup;
use crate::config::SiteSection;

/// Escape text for use in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a tag page filename for use in an href.
fn tag_href(name: &str) -> String {
    format!("{}.html", urlencoding::encode(name))
}

fn shell(site: &SiteSection, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{title} - {site_title}</title>
</head>
<body>
{body}
</body>
</html>
"#,
        lang = escape(&site.language),
        title = escape(title),
        site_title = escape(&site.title),
    )
}

/// Detail page for one note: `node/<id>.html`.
pub fn note_page(site: &SiteSection, note: &RenderedNote) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", escape(note.title())));

    body.push_str("<p class=\"meta\">");
    body.push_str(&note.created_at.format("%Y-%m-%d %H:%M").to_string());
    if !note.source_url().is_empty() {
        body.push_str(&format!(
            r#" &middot; <a href="{}">source</a>"#,
            escape(note.source_url()),
        ));
    }
    body.push_str(&format!(
        r#" &middot; <a href="https://duckduckgo.com/?q={}">search</a>"#,
        note.urlencoded_query,
    ));
    body.push_str("</p>\n");

    body.push_str("<ul class=\"tags\">\n");
    for tag in &note.tags {
        let name = super::tags::normalize_tag_name(&tag.name);
        body.push_str(&format!(
            "<li><a href=\"../tag/{}\">{}</a></li>\n",
            tag_href(&name),
            escape(&tag.name),
        ));
    }
    body.push_str("</ul>\n");

    body.push_str("<div class=\"content\">\n");
    body.push_str(&note.content);
    body.push_str("\n</div>\n");

    shell(site, note.title(), &body)
}

/// Chronological index: `index.html`, notes newest first.
pub fn note_index(site: &SiteSection, notes: &[RenderedNote]) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", escape(&site.title)));
    if !site.description.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", escape(&site.description)));
    }
    body.push_str("<p><a href=\"tag/index.html\">browse by tag</a></p>\n<ul class=\"notes\">\n");
    for note in notes {
        body.push_str(&format!(
            "<li>{} <a href=\"node/{}.html\">{}</a></li>\n",
            note.created_at.format("%Y-%m-%d"),
            note.id,
            escape(note.title()),
        ));
    }
    body.push_str("</ul>\n");
    shell(site, &site.title, &body)
}

/// One tag's page: `tag/<name>.html`.
pub fn tag_page(site: &SiteSection, group: &TagGroup) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n<ul class=\"notes\">\n", escape(&group.name)));
    for note in &group.notes {
        body.push_str(&format!(
            "<li>{} <a href=\"../node/{}.html\">{}</a></li>\n",
            note.created_at.format("%Y-%m-%d"),
            note.id,
            escape(note.title()),
        ));
    }
    body.push_str("</ul>\n");
    shell(site, &group.name, &body)
}

/// A tag listing page (`tag/index.html` and its ordering variants).
pub fn tag_index(site: &SiteSection, heading: &str, groups: &[&TagGroup]) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n<ul class=\"tags\">\n", escape(heading)));
    for group in groups {
        body.push_str(&format!(
            "<li><a href=\"{}\">{}</a> ({})</li>\n",
            tag_href(&group.name),
            escape(&group.name),
            group.notes.len(),
        ));
    }
    body.push_str("</ul>\n");
    shell(site, heading, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::{MirrorRecord, Projection};
    use crate::remote::types::{NoteAttributes, RemoteNote, Tag};
    use std::path::PathBuf;

    fn rendered() -> RenderedNote {
        let note = RemoteNote {
            guid: "n-1".into(),
            title: "Tricks & <Tips>".into(),
            created: 1467826537000,
            updated: 1467826537000,
            deleted: None,
            content: "<en-note><p>body</p></en-note>".into(),
            content_hash: vec![],
            content_length: 30,
            tag_guids: vec!["t-1".into()],
            attributes: NoteAttributes {
                source_url: Some("https://example.com/post".into()),
                ..NoteAttributes::default()
            },
            resources: vec![],
        };
        let tags = vec![Tag {
            guid: "t-1".into(),
            name: "reading".into(),
            parent_guid: None,
            update_sequence_num: 1,
        }];
        let mut projection = Projection::from_note(&note, tags);
        projection.source_url = note.attributes.source_url.clone();
        RenderedNote::build(
            MirrorRecord {
                projection,
                note,
                projection_path: PathBuf::from("data/1467826537000.json"),
            },
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_note_page_escapes_title_and_keeps_content_raw() {
        let site = SiteSection::default();
        let html = note_page(&site, &rendered());
        assert!(html.contains("Tricks &amp; &lt;Tips&gt;"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_note_page_has_each_tag_once() {
        let site = SiteSection::default();
        let html = note_page(&site, &rendered());
        assert_eq!(html.matches(">reading<").count(), 1);
        assert_eq!(html.matches(">example.com<").count(), 1);
    }

    #[test]
    fn test_index_links_notes() {
        let site = SiteSection::default();
        let notes = vec![rendered()];
        let html = note_index(&site, &notes);
        assert!(html.contains("node/1467826537000.html"));
    }

    #[test]
    fn test_tag_href_is_percent_encoded() {
        assert_eq!(tag_href("ri ben"), "ri%20ben.html");
        assert_eq!(tag_href("cli"), "cli.html");
    }
}
