//! `[remote]` section configuration.
//!
//! Endpoint and credentials for the remote note store.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[remote]` section in notepub.toml - remote note store access.
///
/// # Example
/// ```toml
/// [remote]
/// endpoint = "https://notes.example.com/api"
/// token = "S=s1:U=1234:E=..."
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RemoteSection {
    /// Base URL of the note store API.
    #[serde(default = "defaults::remote::endpoint")]
    #[educe(Default = defaults::remote::endpoint())]
    pub endpoint: String,

    /// Developer token sent with every request.
    #[serde(default = "defaults::remote::token")]
    #[educe(Default = defaults::remote::token())]
    pub token: String,
}
