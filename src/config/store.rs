//! `[store]` section configuration.
//!
//! Filesystem locations for the local mirror and the rendered output.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[store]` section in notepub.toml - mirror and output paths.
///
/// Paths are resolved relative to the project root.
///
/// # Example
/// ```toml
/// [store]
/// data = "data"
/// output = "public"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Mirror directory: one `<created>.json` + `<created>.note` pair per
    /// note, plus the tag cache file.
    #[serde(default = "defaults::store::data")]
    #[educe(Default = defaults::store::data())]
    pub data: PathBuf,

    /// Rendered site output directory.
    #[serde(default = "defaults::store::output")]
    #[educe(Default = defaults::store::output())]
    pub output: PathBuf,
}
