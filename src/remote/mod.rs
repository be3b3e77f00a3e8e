//! Remote note store access.
//!
//! The store is an opaque paginated data source behind the [`NoteSource`]
//! trait; [`HttpNoteSource`] is the production implementation. Sync code
//! only ever sees the trait, which keeps it testable against an in-memory
//! fake.

mod http;
pub mod types;

pub use http::HttpNoteSource;

use thiserror::Error;
use types::{Notebook, NoteSummary, RemoteNote, Tag};

/// Remote access failures. None of these are retried; the run aborts.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token is not usable as an Authorization header value")]
    InvalidToken,

    #[error("remote returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("remote response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("remote has no note with guid {0}")]
    NoteNotFound(String),

    #[error("remote has no tag with guid {0}")]
    TagNotFound(String),
}

/// Operations the sync engine needs from the remote store.
///
/// All calls block; ordering and pagination semantics follow the remote
/// listing contract (note summaries sorted by `updated`, descending).
pub trait NoteSource {
    /// All notebooks on the account.
    fn list_notebooks(&self) -> Result<Vec<Notebook>, RemoteError>;

    /// One page of note summaries for a notebook, `updated` descending.
    /// An empty page means the listing is exhausted.
    fn find_notes(
        &self,
        notebook: &Notebook,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<NoteSummary>, RemoteError>;

    /// Full note including resource bodies and recognition data.
    fn get_note(&self, guid: &str) -> Result<RemoteNote, RemoteError>;

    /// Every tag on the account.
    fn list_tags(&self) -> Result<Vec<Tag>, RemoteError>;

    /// Direct single-tag lookup.
    fn get_tag(&self, guid: &str) -> Result<Tag, RemoteError>;

    /// Total note count the remote reports for a notebook. Known to
    /// undercount by one on some accounts.
    fn note_count(&self, notebook: &Notebook) -> Result<usize, RemoteError>;
}
