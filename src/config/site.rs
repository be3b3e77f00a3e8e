//! `[site]` section configuration.
//!
//! Basic site metadata used by the rendered pages.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in notepub.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [site]
/// title = "My Clippings"
/// description = "Everything I clipped this decade"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Site title displayed in page headers and `<title>` tags.
    #[serde(default = "defaults::site::title")]
    #[educe(Default = defaults::site::title())]
    pub title: String,

    /// Site description for the index page header.
    #[serde(default)]
    pub description: String,

    /// BCP 47 language code for the `<html lang>` attribute.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,
}
