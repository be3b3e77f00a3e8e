//! Wire types for the remote note store.
//!
//! Binary fields (resource bodies, content hashes) travel base64-encoded in
//! JSON, both on the wire and in the raw snapshots the mirror keeps.

use serde::{Deserialize, Serialize};

/// A named grouping of notes (the remote "notebook").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    pub guid: String,
    pub name: String,
}

/// One element of the paged note listing. Enough to decide freshness
/// without fetching the full note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSummary {
    pub guid: String,
    pub title: String,
    /// Creation time, milliseconds since the epoch. The mirror's record key.
    pub created: i64,
    /// Last-edit time, milliseconds since the epoch.
    pub updated: i64,
}

/// Free-form note attributes carried by the remote store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Binary attachment of a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteResource {
    pub guid: String,
    /// Declared mime type, e.g. `image/png` or `application/pdf`.
    pub mime: String,
    /// Attachment body.
    #[serde(with = "b64")]
    pub body: Vec<u8>,
    /// OCR/recognition payload, when the store produced one.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "b64_opt")]
    pub recognition: Option<Vec<u8>>,
}

/// A full note as returned by the remote store, resources included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteNote {
    pub guid: String,
    pub title: String,
    pub created: i64,
    pub updated: i64,
    /// Deletion time in milliseconds, present only for deleted notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<i64>,
    /// Raw note markup.
    pub content: String,
    #[serde(with = "b64")]
    pub content_hash: Vec<u8>,
    pub content_length: u64,
    #[serde(default)]
    pub tag_guids: Vec<String>,
    #[serde(default)]
    pub attributes: NoteAttributes,
    #[serde(default)]
    pub resources: Vec<NoteResource>,
}

/// A tag record. Shared across notes, may form a tree via `parent_guid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub guid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_guid: Option<String>,
    pub update_sequence_num: i64,
}

/// base64 (de)serialization for byte fields.
mod b64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// base64 (de)serialization for optional byte fields.
mod b64_opt {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_body_roundtrips_as_base64() {
        let resource = NoteResource {
            guid: "r-1".into(),
            mime: "image/png".into(),
            body: vec![0x89, b'P', b'N', b'G', 0x00, 0xff],
            recognition: None,
        };
        let json = serde_json::to_string(&resource).unwrap();
        assert!(json.contains("iVBOR") || json.contains("\"body\""));
        let back: NoteResource = serde_json::from_str(&json).unwrap();
        assert_eq!(back.body, resource.body);
        assert!(back.recognition.is_none());
    }

    #[test]
    fn test_note_minimal_json() {
        let json = r#"{
            "guid": "n-1",
            "title": "hello",
            "created": 1467826537000,
            "updated": 1467826538000,
            "content": "<en-note>hi</en-note>",
            "content_hash": "AAEC",
            "content_length": 21
        }"#;
        let note: RemoteNote = serde_json::from_str(json).unwrap();
        assert!(note.deleted.is_none());
        assert!(note.tag_guids.is_empty());
        assert!(note.resources.is_empty());
        assert_eq!(note.content_hash, vec![0, 1, 2]);
    }
}
