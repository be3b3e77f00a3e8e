//! `[sync]` section configuration.
//!
//! Paging and convergence tuning for the sync engine.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[sync]` section in notepub.toml - sync engine tuning.
///
/// # Example
/// ```toml
/// [sync]
/// page_size = 49
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SyncSection {
    /// Note summaries requested per remote page.
    #[serde(default = "defaults::sync::page_size")]
    #[educe(Default = defaults::sync::page_size())]
    pub page_size: usize,

    /// Tolerated shortfall between the remote note count and the local
    /// record count when deciding convergence.
    #[serde(default = "defaults::sync::count_slack")]
    #[educe(Default = defaults::sync::count_slack())]
    pub count_slack: usize,
}
