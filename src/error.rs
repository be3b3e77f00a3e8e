//! Fatal application errors with distinct process exit codes.

use thiserror::Error;

/// Exit code for a missing required CLI argument.
pub const EXIT_MISSING_ARGUMENT: i32 = 2;
/// Exit code for an unrecognized CLI action.
pub const EXIT_UNKNOWN_ACTION: i32 = 3;

/// Errors that terminate the run with a dedicated exit code.
///
/// Everything else travels as `anyhow::Error` and exits with code 1.
#[derive(Debug, Error)]
pub enum FatalError {
    /// The requested notebook matched none of the remote notebooks.
    #[error("requested notebook \"{requested}\" not found (candidates were: {})", candidates.join(", "))]
    CollectionNotFound {
        requested: String,
        candidates: Vec<String>,
    },

    /// `ONLY_NOTE_ID` cannot be combined with an indices-only rebuild.
    #[error("ONLY_NOTE_ID is not compatible with rebuild-indices")]
    IndicesOnlyWithScopedRender,

    /// Two distinct notes share a `created` timestamp, which the mirror
    /// uses as its record key. Overwriting would lose a note silently.
    #[error(
        "mirror key collision: created={created} already belongs to note {existing}, refusing to overwrite with {incoming}"
    )]
    CreatedCollision {
        created: i64,
        existing: String,
        incoming: String,
    },
}

impl FatalError {
    /// Process exit code associated with this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CollectionNotFound { .. } => 4,
            Self::IndicesOnlyWithScopedRender => 5,
            Self::CreatedCollision { .. } => 1,
        }
    }
}
