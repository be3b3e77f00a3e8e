//! JSON-over-HTTP implementation of [`NoteSource`].
//!
//! Every request carries the account's developer token in an
//! `Authorization` header. No retry or backoff; transport failures
//! propagate and abort the run.

use super::types::{Notebook, NoteSummary, RemoteNote, Tag};
use super::{NoteSource, RemoteError};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// Blocking HTTP client for the note store API.
pub struct HttpNoteSource {
    client: Client,
    endpoint: String,
}

impl HttpNoteSource {
    /// Build a client for `endpoint`, authenticating with `token`.
    pub fn new(endpoint: &str, token: &str) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| RemoteError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = format!("{}/{}", self.endpoint, path);
        let response = self.client.get(&url).send()?;
        Self::decode(response, &url)
    }

    fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text()?;
        serde_json::from_str(&body).map_err(RemoteError::Decode)
    }
}

impl NoteSource for HttpNoteSource {
    fn list_notebooks(&self) -> Result<Vec<Notebook>, RemoteError> {
        self.get_json("notebooks")
    }

    fn find_notes(
        &self,
        notebook: &Notebook,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<NoteSummary>, RemoteError> {
        // Listing order is fixed server-side: updated, descending.
        self.get_json(&format!(
            "notebooks/{}/notes?order=updated&direction=desc&offset={offset}&limit={limit}",
            notebook.guid
        ))
    }

    fn get_note(&self, guid: &str) -> Result<RemoteNote, RemoteError> {
        match self.get_json(&format!("notes/{guid}?resources=true&recognition=true")) {
            Err(RemoteError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(RemoteError::NoteNotFound(guid.to_string()))
            }
            other => other,
        }
    }

    fn list_tags(&self) -> Result<Vec<Tag>, RemoteError> {
        self.get_json("tags")
    }

    fn get_tag(&self, guid: &str) -> Result<Tag, RemoteError> {
        match self.get_json(&format!("tags/{guid}")) {
            Err(RemoteError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(RemoteError::TagNotFound(guid.to_string()))
            }
            other => other,
        }
    }

    fn note_count(&self, notebook: &Notebook) -> Result<usize, RemoteError> {
        #[derive(serde::Deserialize)]
        struct Count {
            count: usize,
        }
        let count: Count = self.get_json(&format!("notebooks/{}/count", notebook.guid))?;
        Ok(count.count)
    }
}
